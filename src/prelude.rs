//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types so embedders can pull in the
//! whole surface with a single `use jikko::prelude::*;`.

// Session orchestration
pub use crate::session::{SessionState, TaskSession};

// Rule tree engine
pub use crate::rules::{
    CheckedTree, Combinator, FieldChoice, FieldDefinition, FieldKind, LogicExpression, Operator,
    QueryConfig, RuleFormatter, RuleNode, RulesUpdate, build_config, check_tree, from_logic,
    initial_tree, matches_row, matching_rows, on_change, to_logic,
};

// Data model
pub use crate::model::{
    ActionDescriptor, Bucket, Catalog, DataClass, DataEnum, DataRow, EnumItem, Filter,
    FilterConfiguration, ModifyPayload, PropertyAction, PropertyActionKind, PropertyDefinition,
    PropertyType, ReservedAssignment, Tag, TagAssignment, Task, TaskConfiguration, UserInfo,
    merge_properties, property_by_uuid,
};

// Remote store collaborators
pub use crate::client::{DataClient, DataPage, MessageResponse, RestDataClient};
pub use crate::counter::MatchCounter;
pub use crate::executor::{ExecutionOutcome, ReloadFn, TaskExecutor};
pub use crate::notify::{Notification, Notifier, Severity};
pub use crate::selector::{TaskSelection, select_task};

// Error types
pub use crate::error::{ActionError, ApiError, RuleError, SelectError};
