//! # Mocking Utilities
//!
//! [`MockClient`] hands out a real [`ResourceClient`] whose requests are answered from a
//! queue of scripted responses instead of a store. Use it when the code under test is a
//! client wrapper, or an actor whose `Context` holds another actor's client.
//!
//! | | MockClient | Real actor |
//! |---|---|---|
//! | State | scripted replies only | real store |
//! | Error injection | `return_err(...)` | needs a store in the right shape |
//! | Good for | wrappers, dependent actors | the entity itself, end-to-end flows |
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Title { id: u32, stock: u32 }
//! #[derive(Debug)] struct TitleCreate;
//! #[derive(Debug)] enum TitleAction { Reserve(u32) }
//! #[derive(Debug, thiserror::Error)] #[error("title error")] struct TitleError;
//!
//! #[async_trait]
//! impl ActorEntity for Title {
//!     type Id = u32; type Create = TitleCreate; type Update = std::convert::Infallible;
//!     type Action = TitleAction; type ActionResult = u32; type Context = ();
//!     type Error = TitleError;
//!     fn from_create_params(id: u32, _: TitleCreate) -> Result<Self, TitleError> {
//!         Ok(Self { id, stock: 0 })
//!     }
//!     async fn on_update(&mut self, u: Self::Update, _: &()) -> Result<(), TitleError> { match u {} }
//!     async fn handle_action(&mut self, _: TitleAction, _: &()) -> Result<u32, TitleError> {
//!         Ok(self.stock)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Title>::new();
//!     mock.expect_get(1).return_ok(Some(Title { id: 1, stock: 5 }));
//!     mock.expect_action(1).return_err(FrameworkError::ActorClosed);
//!
//!     let client = mock.client();
//!     assert_eq!(client.get(1).await.unwrap().unwrap().stock, 5);
//!     assert!(matches!(
//!         client.perform_action(1, TitleAction::Reserve(2)).await,
//!         Err(FrameworkError::ActorClosed)
//!     ));
//!     mock.verify();
//! }
//! ```
//!
//! When a test needs to look at the request payload, use [`create_mock_client`] and the
//! `expect_*` receiver helpers instead.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};

/// A scripted reply, consumed in FIFO order.
enum Expectation<T: ActorEntity> {
    Get(Result<Option<T>, FrameworkError>),
    Find(Result<Vec<T>, FrameworkError>),
    Create(Result<T::Id, FrameworkError>),
    Update(Result<T, FrameworkError>),
    Action(Result<T::ActionResult, FrameworkError>),
}

impl<T: ActorEntity> Expectation<T> {
    fn kind(&self) -> &'static str {
        match self {
            Expectation::Get(_) => "get",
            Expectation::Find(_) => "find",
            Expectation::Create(_) => "create",
            Expectation::Update(_) => "update",
            Expectation::Action(_) => "action",
        }
    }
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn push<T: ActorEntity>(queue: &Queue<T>, expectation: Expectation<T>) {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push_back(expectation);
}

/// A client backed by scripted responses.
///
/// A request that arrives with no matching expectation at the head of the queue panics the
/// responder task, which the caller observes as [`FrameworkError::ActorDropped`].
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a mock with an empty script. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(64);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let script = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = script
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front();

                match (request, next) {
                    (ResourceRequest::Get { respond_to, .. }, Some(Expectation::Get(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Find { respond_to, .. }, Some(Expectation::Find(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Update { respond_to, .. }, Some(Expectation::Update(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Action { respond_to, .. }, Some(Expectation::Action(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (_, Some(other)) => {
                        panic!("Unexpected request, next expectation is {}", other.kind())
                    }
                    (_, None) => panic!("Unexpected request, no expectations left"),
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(format!("get {id}"), Expectation::Get)
    }

    pub fn expect_find(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder("find".to_string(), Expectation::Find)
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder("create".to_string(), Expectation::Create)
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(format!("update {id}"), Expectation::Update)
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(format!("action {id}"), Expectation::Action)
    }

    fn builder<R>(
        &self,
        label: String,
        wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            label,
            wrap,
            expectations: self.expectations.clone(),
        }
    }

    /// Panics unless every scripted response has been consumed.
    pub fn verify(&self) {
        let remaining = self
            .expectations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Completes an `expect_*` call with the reply to script.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    label: String,
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    expectations: Queue<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        tracing::trace!(expectation = %self.label, "Scripted ok");
        push(&self.expectations, (self.wrap)(Ok(value)));
    }

    pub fn return_err(self, error: FrameworkError) {
        tracing::trace!(expectation = %self.label, %error, "Scripted err");
        push(&self.expectations, (self.wrap)(Err(error)));
    }
}

/// Creates a client whose requests land on a receiver the test reads directly.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next request, if it is a Create.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next request, if it is a Get.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next request, if it is an Action.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Title {
        id: u32,
        stock: u32,
    }

    #[derive(Debug)]
    struct TitleCreate {
        stock: u32,
    }

    #[derive(Debug, PartialEq)]
    enum TitleAction {
        Reserve(u32),
    }

    #[derive(Debug, thiserror::Error)]
    #[error("not enough copies")]
    struct TitleError;

    #[async_trait]
    impl ActorEntity for Title {
        type Id = u32;
        type Create = TitleCreate;
        type Update = std::convert::Infallible;
        type Action = TitleAction;
        type ActionResult = u32;
        type Context = ();
        type Error = TitleError;

        fn from_create_params(id: u32, params: TitleCreate) -> Result<Self, TitleError> {
            Ok(Self {
                id,
                stock: params.stock,
            })
        }

        async fn on_update(&mut self, update: Self::Update, _ctx: &()) -> Result<(), TitleError> {
            match update {}
        }

        async fn handle_action(&mut self, action: TitleAction, _ctx: &()) -> Result<u32, TitleError> {
            let TitleAction::Reserve(n) = action;
            self.stock = self.stock.checked_sub(n).ok_or(TitleError)?;
            Ok(self.stock)
        }
    }

    #[tokio::test]
    async fn test_receiver_helpers_expose_payloads() {
        let (client, mut receiver) = create_mock_client::<Title>(4);

        let task = tokio::spawn(async move {
            let id = client.create(TitleCreate { stock: 3 }).await?;
            client.perform_action(id, TitleAction::Reserve(2)).await
        });

        let (params, responder) = expect_create(&mut receiver).await.expect("create");
        assert_eq!(params.stock, 3);
        responder.send(Ok(7)).unwrap();

        let (id, action, responder) = expect_action(&mut receiver).await.expect("action");
        assert_eq!(id, 7);
        assert_eq!(action, TitleAction::Reserve(2));
        responder.send(Ok(1)).unwrap();

        assert_eq!(task.await.unwrap().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let mut mock = MockClient::<Title>::new();
        mock.expect_find()
            .return_ok(vec![Title { id: 1, stock: 4 }, Title { id: 2, stock: 0 }]);
        mock.expect_get(2).return_ok(None);
        mock.expect_action(1)
            .return_err(FrameworkError::NotFound("1".into()));

        let client = mock.client();
        assert_eq!(client.find(|_| true).await.unwrap().len(), 2);
        assert_eq!(client.get(2).await.unwrap(), None);
        assert!(matches!(
            client.perform_action(1, TitleAction::Reserve(1)).await,
            Err(FrameworkError::NotFound(_))
        ));
        mock.verify();
    }

    #[tokio::test]
    async fn test_unscripted_request_drops_reply() {
        let mock = MockClient::<Title>::new();
        let result = mock.client().get(1).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
    }
}
