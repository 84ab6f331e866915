use crate::client::DataClient;
use crate::model::Bucket;
use crate::notify::Notifier;
use crate::rules::LogicExpression;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default debounce window between a rule edit and the count query it
/// eventually issues.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Tracks how many rows currently match the rule, querying the remote store
/// with a debounce so rapid edits collapse into a single request.
///
/// Every refresh is stamped with a generation token. The query is only sent
/// when its generation is still the latest once the debounce window has
/// passed, and its result is only applied when the generation is still the
/// latest at completion time. An out-of-order completion from a superseded
/// call can therefore never overwrite a newer count.
#[derive(Clone)]
pub struct MatchCounter {
    client: Arc<dyn DataClient>,
    notifier: Notifier,
    debounce: Duration,
    generation: Arc<AtomicU64>,
    open: Arc<AtomicBool>,
    count: Arc<AtomicU64>,
}

impl MatchCounter {
    pub fn new(client: Arc<dyn DataClient>, notifier: Notifier) -> Self {
        Self::with_debounce(client, notifier, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(
        client: Arc<dyn DataClient>,
        notifier: Notifier,
        debounce: Duration,
    ) -> Self {
        Self {
            client,
            notifier,
            debounce,
            generation: Arc::new(AtomicU64::new(0)),
            open: Arc::new(AtomicBool::new(true)),
            count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The count produced by the most recently issued completed query. A
    /// failed query leaves the previous count in place.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }

    /// Marks the owning dialog opened or closed. While closed, pending
    /// refreshes are dropped at wake and in-flight results are discarded at
    /// completion.
    pub fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::SeqCst);
    }

    /// Schedules a debounced count query for the given predicate. Returns
    /// the task handle so callers can await settling in tests; the count
    /// itself is published through [`MatchCounter::count`].
    pub fn refresh(&self, bucket: &Bucket, logic: Option<&LogicExpression>) -> JoinHandle<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let client = Arc::clone(&self.client);
        let notifier = self.notifier.clone();
        let latest = Arc::clone(&self.generation);
        let open = Arc::clone(&self.open);
        let count = Arc::clone(&self.count);
        let debounce = self.debounce;
        let bucket = bucket.clone();
        let logic = logic.cloned();

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            // Superseded while waiting, or the dialog closed: no query.
            if generation != latest.load(Ordering::SeqCst) || !open.load(Ordering::SeqCst) {
                return;
            }

            match client.count_matches(&bucket, logic.as_ref()).await {
                Ok(total) => {
                    // A newer call was issued while this one was in flight;
                    // its result owns the display now.
                    if generation == latest.load(Ordering::SeqCst) && open.load(Ordering::SeqCst) {
                        count.store(total, Ordering::SeqCst);
                    }
                }
                Err(error) => {
                    // The previous count stays on display.
                    notifier.error("Error", error.to_string());
                }
            }
        })
    }
}
