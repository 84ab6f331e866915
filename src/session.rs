use crate::client::DataClient;
use crate::counter::{DEFAULT_DEBOUNCE, MatchCounter};
use crate::error::SelectError;
use crate::executor::{ExecutionOutcome, ReloadFn, TaskExecutor};
use crate::model::{ActionDescriptor, Bucket, Catalog, PropertyDefinition};
use crate::notify::Notifier;
use crate::rules::{LogicExpression, QueryConfig, RuleNode, build_config, initial_tree, on_change};
use crate::selector::select_task;
use std::sync::Arc;
use std::time::Duration;

/// The mutable dialog state: the selected action, the reconciled property
/// list and the current rule tree with its derived logic and configuration.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub actions: Option<ActionDescriptor>,
    pub properties: Vec<PropertyDefinition>,
    pub logic: Option<LogicExpression>,
    pub tree: RuleNode,
    pub config: QueryConfig,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            actions: None,
            properties: Vec::new(),
            logic: None,
            tree: RuleNode::empty(),
            config: QueryConfig::default(),
        }
    }
}

/// Drives one task-execution dialog: owns the state object, the live match
/// counter and the executor, and applies task selections, rule edits and
/// execution requests. State is ephemeral and rebuilt on every open.
pub struct TaskSession {
    bucket: Bucket,
    catalog: Catalog,
    notifier: Notifier,
    counter: MatchCounter,
    executor: TaskExecutor,
    state: SessionState,
    open: bool,
}

impl TaskSession {
    /// Creates a closed session for a bucket. `reload` runs after every
    /// successful mutating operation.
    pub fn new(
        bucket: Bucket,
        catalog: Catalog,
        client: Arc<dyn DataClient>,
        notifier: Notifier,
        reload: ReloadFn,
    ) -> Self {
        Self::with_debounce(bucket, catalog, client, notifier, reload, DEFAULT_DEBOUNCE)
    }

    /// Creates a closed session with an explicit counter debounce window.
    pub fn with_debounce(
        bucket: Bucket,
        catalog: Catalog,
        client: Arc<dyn DataClient>,
        notifier: Notifier,
        reload: ReloadFn,
        debounce: Duration,
    ) -> Self {
        let counter = MatchCounter::with_debounce(Arc::clone(&client), notifier.clone(), debounce);
        let executor = TaskExecutor::new(client, notifier.clone(), counter.clone(), reload);
        Self {
            bucket,
            catalog,
            notifier,
            counter,
            executor,
            state: SessionState::default(),
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn counter(&self) -> &MatchCounter {
        &self.counter
    }

    /// The most recent matching-row count.
    pub fn match_count(&self) -> u64 {
        self.counter.count()
    }

    /// Opens the dialog: rebuilds the ephemeral state from the bucket's
    /// class and starts counting against the empty matches-all rule.
    pub fn open(&mut self) -> Result<(), SelectError> {
        let properties = self.catalog.class_properties(&self.bucket)?;
        let config = build_config(
            &properties,
            &self.catalog.bucket_tags(&self.bucket),
            &self.catalog.users,
            &self.catalog.enums,
        );
        let checked = initial_tree(None, None, &config);
        self.state = SessionState {
            actions: None,
            properties,
            logic: None,
            tree: checked.tree,
            config,
        };
        self.open = true;
        self.counter.set_open(true);
        let _ = self.counter.refresh(&self.bucket, None);
        Ok(())
    }

    /// Closes the dialog. Pending count queries are dropped and late
    /// completions discarded.
    pub fn close(&mut self) {
        self.open = false;
        self.counter.set_open(false);
    }

    /// Applies a task template: seeds action, properties, configuration and
    /// rule tree, then recounts with the seeded predicate.
    pub fn select_task(&mut self, task_id: i64) -> Result<(), SelectError> {
        let task = self
            .catalog
            .task(task_id)
            .ok_or(SelectError::TaskNotFound(task_id))?;
        let selection = select_task(task, &self.bucket, &self.catalog)?;
        self.state = SessionState {
            actions: Some(selection.actions),
            properties: selection.properties,
            logic: selection.logic,
            tree: selection.tree,
            config: selection.config,
        };
        let _ = self.counter.refresh(&self.bucket, self.state.logic.as_ref());
        Ok(())
    }

    /// Applies a user edit to the rule tree. The counter only refreshes
    /// when the derived logic actually changed.
    pub fn rules_changed(&mut self, tree: RuleNode) {
        let update = on_change(&tree, &self.state.config, self.state.logic.as_ref());
        let changed = update.changed;
        self.state.tree = update.tree;
        self.state.logic = update.logic;
        if changed {
            let _ = self.counter.refresh(&self.bucket, self.state.logic.as_ref());
        }
    }

    pub fn set_actions(&mut self, actions: ActionDescriptor) {
        self.state.actions = Some(actions);
    }

    pub fn set_properties(&mut self, properties: Vec<PropertyDefinition>) {
        self.state.properties = properties;
    }

    /// Executes the selected action against all rows matching the current
    /// rule. Without a selected action this is a no-op beyond an
    /// informational notification.
    pub async fn execute(&self) -> ExecutionOutcome {
        let Some(actions) = self.state.actions.as_ref() else {
            self.notifier.info("No action has been selected!", "");
            return ExecutionOutcome::NoModification;
        };
        self.executor
            .execute(
                &self.bucket,
                actions,
                &self.state.properties,
                self.state.logic.as_ref(),
            )
            .await
    }
}
