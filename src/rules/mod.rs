pub mod check;
pub mod config;
pub mod eval;
pub mod logic;
pub mod render;

pub use check::*;
pub use config::*;
pub use eval::*;
pub use logic::*;
pub use render::*;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// How a group combines the results of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    And,
    Or,
}

/// Comparison operators available in rule conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl Operator {
    /// Short display symbol, used by the rule formatter.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Less => "<",
            Operator::LessOrEqual => "<=",
            Operator::In => "in",
            Operator::NotIn => "not in",
            Operator::IsNull => "is null",
            Operator::IsNotNull => "is not null",
        }
    }
}

/// The boolean rule tree built by the user: either a combinator group or a
/// single field condition. Trees are ephemeral dialog state; only the
/// derived logic expression crosses the network boundary, though filters
/// persist the tree alongside it to restore the builder faithfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RuleNode {
    Group {
        combinator: Combinator,
        children: Vec<RuleNode>,
    },
    #[serde(rename_all = "camelCase")]
    Condition {
        property_path: String,
        operator: Operator,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        operand: Option<Value>,
    },
}

impl RuleNode {
    /// The default tree: an empty AND group, which matches every row.
    pub fn empty() -> Self {
        RuleNode::Group {
            combinator: Combinator::And,
            children: Vec::new(),
        }
    }

    pub fn and(children: Vec<RuleNode>) -> Self {
        RuleNode::Group {
            combinator: Combinator::And,
            children,
        }
    }

    pub fn or(children: Vec<RuleNode>) -> Self {
        RuleNode::Group {
            combinator: Combinator::Or,
            children,
        }
    }

    pub fn condition(
        property_path: impl Into<String>,
        operator: Operator,
        operand: Option<Value>,
    ) -> Self {
        RuleNode::Condition {
            property_path: property_path.into(),
            operator,
            operand,
        }
    }

    /// True when the tree contains no conditions at all. An empty tree has
    /// no predicate and matches every row.
    pub fn is_empty(&self) -> bool {
        match self {
            RuleNode::Group { children, .. } => children.iter().all(RuleNode::is_empty),
            RuleNode::Condition { .. } => false,
        }
    }

    /// Collects every field path referenced by a condition in the tree.
    pub fn referenced_paths(&self, paths: &mut HashSet<String>) {
        match self {
            RuleNode::Group { children, .. } => {
                for child in children {
                    child.referenced_paths(paths);
                }
            }
            RuleNode::Condition { property_path, .. } => {
                paths.insert(property_path.clone());
            }
        }
    }
}
