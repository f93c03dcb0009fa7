use crate::book_actor::{self, BookError};
use crate::clients::{BookClient, OrderClient};
use crate::config::Config;
use crate::lifecycle::reconcile;
use crate::model::{BookCreate, BookId};
use crate::order_actor::{self, OrderContext};
use crate::query::{OrderQueryService, QueryLimits};
use std::path::Path;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Errors raised while loading the initial catalog.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Cannot read catalog seed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog seed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rejected catalog entry: {0}")]
    Book(#[from] BookError),
}

/// The running order core: catalog actor, ledger actor and reconciliation job.
///
/// ```rust
/// use bookstore_orders::config::Config;
/// use bookstore_orders::lifecycle::OrderSystem;
/// use bookstore_orders::model::BookCreate;
///
/// #[tokio::main]
/// async fn main() -> Result<(), String> {
///     let system = OrderSystem::start(&Config::default());
///     let id = system
///         .book_client
///         .create_book(BookCreate::new("Emma", "Jane Austen", 7.5, 3))
///         .await
///         .map_err(|e| e.to_string())?;
///     assert_eq!(system.book_client.check_stock(id).await, Ok(3));
///     system.shutdown().await
/// }
/// ```
pub struct OrderSystem {
    pub book_client: BookClient,
    pub order_client: OrderClient,
    limits: QueryLimits,
    stop_reconcile: watch::Sender<bool>,
    reconcile_handle: Option<JoinHandle<()>>,
    /// Ledger first: its context holds a catalog client.
    actor_handles: Vec<JoinHandle<()>>,
}

impl OrderSystem {
    /// Spawns every actor and, unless disabled in `config`, the reconciliation job.
    pub fn start(config: &Config) -> Self {
        let (book_actor, book_resource_client) = book_actor::new(config.actor_buffer_size);
        let (order_actor, order_resource_client) = order_actor::new(config.actor_buffer_size);
        let book_client = BookClient::new(book_resource_client);
        let order_client = OrderClient::new(order_resource_client);

        let book_handle = tokio::spawn(book_actor.run(()));
        let context =
            OrderContext::new(book_client.clone()).with_restock_retry(config.restock_retry());
        let order_handle = tokio::spawn(order_actor.run(context));

        let (stop_reconcile, stop_rx) = watch::channel(false);
        let reconcile_handle = config.reconcile_interval().map(|period| {
            info!(period_secs = period.as_secs(), "Starting stock reconciliation");
            tokio::spawn(reconcile::run(order_client.clone(), period, stop_rx))
        });

        info!("Order system started");
        Self {
            book_client,
            order_client,
            limits: QueryLimits::from(config),
            stop_reconcile,
            reconcile_handle,
            actor_handles: vec![order_handle, book_handle],
        }
    }

    /// A read service sharing this system's actors.
    pub fn query_service(&self) -> OrderQueryService {
        OrderQueryService::new(
            self.order_client.clone(),
            self.book_client.clone(),
            self.limits,
        )
    }

    /// Loads a JSON array of books into the catalog. Returns the new ids in file order.
    pub async fn seed_catalog(&self, path: &Path) -> Result<Vec<BookId>, SeedError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let books: Vec<BookCreate> = serde_json::from_str(&raw)?;
        let mut ids = Vec::with_capacity(books.len());
        for book in books {
            ids.push(self.book_client.create_book(book).await?);
        }
        info!(count = ids.len(), path = %path.display(), "Catalog seeded");
        Ok(ids)
    }

    /// Stops the reconciliation job, closes the actors' mailboxes and waits for them.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down order system");
        // Err only means the job is already gone.
        let _ = self.stop_reconcile.send(true);
        if let Some(handle) = self.reconcile_handle {
            if let Err(e) = handle.await {
                error!(error = ?e, "Reconcile task failed");
                return Err(format!("Reconcile task failed: {e:?}"));
            }
        }

        drop(self.order_client);
        drop(self.book_client);

        for handle in self.actor_handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(format!("Actor task failed: {e:?}"));
            }
        }

        info!("Order system shutdown complete");
        Ok(())
    }
}
