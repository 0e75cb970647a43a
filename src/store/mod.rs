use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

pub mod checklist_store;
pub mod defect_store;
pub mod inspection_store;
pub mod inspector_store;
pub mod photo_store;
pub mod product_type_store;

pub use checklist_store::ChecklistStore;
pub use defect_store::DefectStore;
pub use inspection_store::InspectionStore;
pub use inspector_store::InspectorStore;
pub use photo_store::PhotoStore;
pub use product_type_store::ProductTypeStore;

use crate::error::Result;

/// Tables a live query can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Inspections,
    DefectRecords,
    InspectionPhotos,
    Inspectors,
    ProductTypes,
    ChecklistItems,
    ChecklistResponses,
}

/// Fan-out of row-change events. Stores publish after every successful
/// mutation; live queries re-run on matching events.
pub struct ChangeNotifier {
    tx: broadcast::Sender<Table>,
}

impl ChangeNotifier {
    pub fn new() -> Arc<Self> {
        let (tx, _) = broadcast::channel(64);
        Arc::new(ChangeNotifier { tx })
    }

    pub fn notify(&self, table: Table) {
        // No subscribers is not an error.
        let _ = self.tx.send(table);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Table> {
        self.tx.subscribe()
    }
}

/// Run `query` once immediately and again after every change to one of
/// `tables`, pushing each result set to the returned receiver. The task
/// ends when the receiver is dropped.
pub(crate) fn spawn_watch<T, F, Fut>(
    notifier: &ChangeNotifier,
    tables: &'static [Table],
    query: F,
) -> mpsc::UnboundedReceiver<Vec<T>>
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let mut changes = notifier.subscribe();

    tokio::spawn(async move {
        loop {
            match query().await {
                Ok(rows) => {
                    if tx.send(rows).is_err() {
                        return;
                    }
                }
                Err(error) => {
                    tracing::error!(%error, "live query failed");
                }
            }

            loop {
                match changes.recv().await {
                    Ok(table) if tables.contains(&table) => break,
                    Ok(_) => continue,
                    // Missed events are indistinguishable from a relevant
                    // change, so re-run the query.
                    Err(broadcast::error::RecvError::Lagged(_)) => break,
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
        }
    });

    rx
}
