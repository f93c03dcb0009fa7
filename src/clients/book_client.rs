//! # Book Client
//!
//! Typed access to the catalog actor. Errors coming back through the actor are turned
//! into [`BookError`] again, so callers can match on `InsufficientStock` directly.
use crate::book_actor::{BookAction, BookActionResult, BookError};
use crate::model::{Book, BookCreate, BookId, BookUpdate};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Client for interacting with the Book actor.
#[derive(Clone)]
pub struct BookClient {
    inner: ResourceClient<Book>,
}

impl BookClient {
    pub fn new(inner: ResourceClient<Book>) -> Self {
        Self { inner }
    }
}

impl ActorClient<Book> for BookClient {
    type Error = BookError;

    fn inner(&self) -> &ResourceClient<Book> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        e.into_entity_error::<BookError>()
            .unwrap_or_else(|e| BookError::ActorCommunicationError(e.to_string()))
    }
}

/// Like [`ActorClient::map_error`], but reports a missing record as this book.
fn map_for(id: BookId) -> impl FnOnce(FrameworkError) -> BookError {
    move |e| match e {
        FrameworkError::NotFound(_) => BookError::NotFound(id),
        other => BookClient::map_error(other),
    }
}

impl BookClient {
    #[instrument(skip(self))]
    pub async fn create_book(&self, params: BookCreate) -> Result<BookId, BookError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_book(&self, id: BookId, update: BookUpdate) -> Result<Book, BookError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(map_for(id))
    }

    /// Fetches every book in `wanted` in one round trip. Unknown ids are skipped.
    #[instrument(skip(self, wanted))]
    pub async fn books(&self, wanted: HashSet<BookId>) -> Result<Vec<Book>, BookError> {
        debug!(count = wanted.len(), "Sending request");
        self.inner
            .find(move |book: &Book| wanted.contains(&book.id))
            .await
            .map_err(Self::map_error)
    }

    /// Current stock level.
    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: BookId) -> Result<u32, BookError> {
        debug!("Checking stock");
        match self.inner.perform_action(id, BookAction::CheckStock).await {
            Ok(BookActionResult::CheckStock(level)) => Ok(level),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(map_for(id)(e)),
        }
    }

    /// Takes `quantity` copies if they are available. Returns the remaining stock.
    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: BookId, quantity: u32) -> Result<u32, BookError> {
        debug!("Reserving stock");
        match self
            .inner
            .perform_action(id, BookAction::ReserveStock(quantity))
            .await
        {
            Ok(BookActionResult::ReserveStock(left)) => Ok(left),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(map_for(id)(e)),
        }
    }

    /// Puts `quantity` copies back. Returns the new stock.
    #[instrument(skip(self))]
    pub async fn restore_stock(&self, id: BookId, quantity: u32) -> Result<u32, BookError> {
        debug!("Restoring stock");
        match self
            .inner
            .perform_action(id, BookAction::RestoreStock(quantity))
            .await
        {
            Ok(BookActionResult::RestoreStock(level)) => Ok(level),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(map_for(id)(e)),
        }
    }
}

fn unexpected(result: BookActionResult) -> BookError {
    BookError::ActorCommunicationError(format!("unexpected action result {result:?}"))
}
