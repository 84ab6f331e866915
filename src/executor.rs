use crate::client::DataClient;
use crate::counter::MatchCounter;
use crate::model::{ActionDescriptor, Bucket, PropertyDefinition};
use crate::notify::Notifier;
use crate::rules::LogicExpression;
use std::sync::Arc;

/// Callback invoked after every successful mutating operation so the
/// surrounding listing can refresh its own view of the rows.
pub type ReloadFn = Arc<dyn Fn() + Send + Sync>;

/// What happened when a task was executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The remote operation succeeded; carries the server's summary message.
    Completed { message: String },
    /// The action described no modification, so no request was made.
    NoModification,
    /// Payload validation or the remote call failed; the details went
    /// through the notifier.
    Failed { message: String },
}

/// Runs bulk remove/mutate operations against the rows matching the current
/// rule. Every outcome, good or bad, is also reported through the notifier;
/// failures are never retried and the remote applies mutations atomically.
#[derive(Clone)]
pub struct TaskExecutor {
    client: Arc<dyn DataClient>,
    notifier: Notifier,
    counter: MatchCounter,
    reload: ReloadFn,
}

impl TaskExecutor {
    pub fn new(
        client: Arc<dyn DataClient>,
        notifier: Notifier,
        counter: MatchCounter,
        reload: ReloadFn,
    ) -> Self {
        Self {
            client,
            notifier,
            counter,
            reload,
        }
    }

    /// Executes the action against every row matching `logic`. A mutate
    /// action that composes an empty payload refuses to touch the network
    /// and reports [`ExecutionOutcome::NoModification`] instead.
    pub async fn execute(
        &self,
        bucket: &Bucket,
        actions: &ActionDescriptor,
        properties: &[PropertyDefinition],
        logic: Option<&LogicExpression>,
    ) -> ExecutionOutcome {
        match actions {
            ActionDescriptor::Remove => match self.client.delete_matching(bucket, logic).await {
                Ok(response) => self.completed(bucket, logic, response.message),
                Err(error) => self.failed(error.to_string()),
            },
            ActionDescriptor::Mutate { .. } => {
                let payload = match actions.modify_payload(properties, logic) {
                    Ok(Some(payload)) => payload,
                    Ok(None) => {
                        self.notifier.info("No modifications have been defined!", "");
                        return ExecutionOutcome::NoModification;
                    }
                    Err(error) => {
                        // Caught before any network side effect.
                        self.notifier.warning("Invalid action", error.to_string());
                        return ExecutionOutcome::Failed {
                            message: error.to_string(),
                        };
                    }
                };
                match self.client.update_matching(bucket, &payload).await {
                    Ok(response) => self.completed(bucket, logic, response.message),
                    Err(error) => self.failed(error.to_string()),
                }
            }
        }
    }

    fn completed(
        &self,
        bucket: &Bucket,
        logic: Option<&LogicExpression>,
        message: String,
    ) -> ExecutionOutcome {
        self.notifier.success(&message, "");
        let _ = self.counter.refresh(bucket, logic);
        (self.reload)();
        ExecutionOutcome::Completed { message }
    }

    fn failed(&self, message: String) -> ExecutionOutcome {
        self.notifier.error("Error", &message);
        ExecutionOutcome::Failed { message }
    }
}
