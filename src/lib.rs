//! # Jikko - Rule-Driven Bulk Task Execution Core
//!
//! **Jikko** is the execution core of a data-management application: it turns
//! a visually built boolean rule tree into a portable, JsonLogic-compatible
//! predicate, reconciles property definitions from multiple sources, keeps a
//! live debounced count of the rows matching the rule, and applies bulk
//! actions (delete, tag, reserve, set or clear properties) to exactly those
//! rows through a remote data-store API.
//!
//! ## Core Workflow
//!
//! The crate is UI-agnostic. The embedding application supplies reference
//! data (classes, tags, users, enumerations, tasks and filters) as an
//! explicit [`model::Catalog`] and a [`client::DataClient`] implementation
//! for the remote store. The primary workflow is:
//!
//! 1.  **Open a session**: create a [`session::TaskSession`] for a bucket
//!     and open it. The session reconciles the bucket's class properties,
//!     builds the [`rules::QueryConfig`] and starts counting against the
//!     empty matches-all rule.
//! 2.  **Select a task**: a task template seeds the action, the property
//!     list and, when the task references a filter, the stored rule tree.
//! 3.  **Edit the rule**: every edit revalidates the tree, recomputes the
//!     logic expression and, only when the logic actually changed, refreshes
//!     the debounced match counter.
//! 4.  **Execute**: the bulk action runs against every matching row; the
//!     outcome is reported through the notification channel and a successful
//!     mutation triggers a recount and the caller's reload hook.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jikko::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! // Reference data, normally fetched once by the embedding application.
//! let catalog = Catalog::default();
//! let bucket = Bucket {
//!     id: 1,
//!     name: "shipments".to_string(),
//!     class_id: None,
//!     tags_ids: vec![],
//!     tasks_ids: vec![],
//!     filters_ids: vec![],
//! };
//!
//! let client = Arc::new(RestDataClient::new("https://data.example.com")?);
//! let (notifier, mut notifications) = Notifier::channel();
//! let reload: ReloadFn = Arc::new(|| {});
//!
//! let mut session = TaskSession::new(bucket, catalog, client, notifier, reload);
//! session.open()?;
//!
//! // Build a rule: status == "open".
//! let tree = RuleNode::and(vec![RuleNode::condition(
//!     "$.status",
//!     Operator::Equal,
//!     Some(serde_json::json!("open")),
//! )]);
//! session.rules_changed(tree);
//!
//! // Run the selected action against every matching row.
//! session.set_actions(ActionDescriptor::Remove);
//! let outcome = session.execute().await;
//! println!("outcome: {:?}", outcome);
//!
//! while let Ok(notification) = notifications.try_recv() {
//!     println!("{:?}: {}", notification.severity, notification.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod counter;
pub mod error;
pub mod executor;
pub mod model;
pub mod notify;
pub mod prelude;
pub mod rules;
pub mod selector;
pub mod session;
