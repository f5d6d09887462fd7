use crate::api::ProductApi;
use crate::error::VerifyError;
use crate::product::{NewProduct, ProductId, ProductRow};
use crate::store::ProductStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

/// Price comparison tolerance: one cent.
const PRICE_TOLERANCE: f64 = 0.01;

/// Outcome of a successful round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub id: ProductId,
    pub row: ProductRow,
    /// Time between the create response and the row becoming visible.
    pub elapsed: Duration,
    /// Rows removed by the cleanup.
    pub deleted: usize,
}

/// Creates a product through the API and checks the row the backend wrote.
pub struct ProductVerifier<A, S> {
    api: A,
    store: Arc<S>,
    settle_timeout: Duration,
    poll_interval: Duration,
}

impl<A: ProductApi, S: ProductStore + 'static> ProductVerifier<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store: Arc::new(store),
            settle_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(200),
        }
    }

    pub fn with_timing(mut self, settle_timeout: Duration, poll_interval: Duration) -> Self {
        self.settle_timeout = settle_timeout;
        self.poll_interval = poll_interval;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run create, wait, compare and delete.
    ///
    /// The row is deleted whenever it was found, also when the comparison
    /// fails. A comparison failure is reported even if the cleanup fails too.
    pub async fn verify(&self, product: &NewProduct) -> Result<Verification, VerifyError> {
        let id = self.api.create_product(product).await?;
        info!(id = %id, name = %product.name, "Product created through API");

        let (row, elapsed) = self.wait_for_row(&id).await?;
        debug!(id = %id, elapsed_ms = elapsed.as_millis() as u64, "Row persisted");

        let compared = compare(product, &row);
        let cleanup = {
            let id = id.clone();
            self.with_store(move |store| store.delete_product(&id)).await
        };
        let deleted = match (cleanup, compared) {
            (Ok(deleted), compared) => {
                if deleted == 0 {
                    warn!(id = %id, "Cleanup deleted no rows");
                } else {
                    info!(id = %id, deleted, "Test product removed");
                }
                compared?;
                deleted
            }
            (Err(cleanup), Err(mismatch)) => {
                warn!(id = %id, error = %cleanup, "Cleanup failed after a field mismatch");
                return Err(mismatch);
            }
            (Err(cleanup), Ok(())) => return Err(cleanup),
        };

        Ok(Verification {
            id,
            row,
            elapsed,
            deleted,
        })
    }

    async fn wait_for_row(&self, id: &ProductId) -> Result<(ProductRow, Duration), VerifyError> {
        let start = Instant::now();
        loop {
            let lookup = id.clone();
            if let Some(row) = self
                .with_store(move |store| store.find_product(&lookup))
                .await?
            {
                return Ok((row, start.elapsed()));
            }
            let elapsed = start.elapsed();
            if elapsed >= self.settle_timeout {
                return Err(VerifyError::NotPersisted {
                    id: id.clone(),
                    elapsed_ms: elapsed.as_millis() as u64,
                });
            }
            sleep(self.poll_interval.min(self.settle_timeout - elapsed)).await;
        }
    }

    async fn with_store<T, F>(&self, op: F) -> Result<T, VerifyError>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Result<T, VerifyError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(&store)).await?
    }
}

fn compare(expected: &NewProduct, actual: &ProductRow) -> Result<(), VerifyError> {
    if actual.name != expected.name {
        return Err(VerifyError::Mismatch {
            field: "name",
            expected: expected.name.clone(),
            actual: actual.name.clone(),
        });
    }
    if (actual.price - expected.price).abs() >= PRICE_TOLERANCE {
        return Err(VerifyError::Mismatch {
            field: "price",
            expected: format!("{:.2}", expected.price),
            actual: format!("{:.2}", actual.price),
        });
    }
    if actual.quantity != expected.quantity {
        return Err(VerifyError::Mismatch {
            field: "quantity",
            expected: expected.quantity.to_string(),
            actual: actual.quantity.to_string(),
        });
    }
    Ok(())
}
