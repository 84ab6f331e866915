use super::{LogicExpression, QueryConfig, RuleNode, from_logic, to_logic};
use crate::error::RuleError;

/// A condition removed during validation, with the reason it was dropped.
#[derive(Debug, Clone)]
pub struct DroppedCondition {
    /// The field path the condition referenced; empty when an entire stored
    /// logic expression failed to parse.
    pub path: String,
    pub reason: RuleError,
}

/// A rule tree that has been validated against a query configuration.
#[derive(Debug, Clone)]
pub struct CheckedTree {
    pub tree: RuleNode,
    pub dropped: Vec<DroppedCondition>,
}

/// Validates a tree against the configuration, dropping conditions that
/// reference unknown fields or use an operator their field does not allow.
/// Groups survive even when all their conditions are dropped; an empty group
/// contributes no predicate.
pub fn check_tree(tree: &RuleNode, config: &QueryConfig) -> CheckedTree {
    let mut dropped = Vec::new();
    let tree = check_node(tree, config, &mut dropped).unwrap_or_else(RuleNode::empty);
    CheckedTree { tree, dropped }
}

fn check_node(
    node: &RuleNode,
    config: &QueryConfig,
    dropped: &mut Vec<DroppedCondition>,
) -> Option<RuleNode> {
    match node {
        RuleNode::Group {
            combinator,
            children,
        } => {
            let children = children
                .iter()
                .filter_map(|child| check_node(child, config, dropped))
                .collect();
            Some(RuleNode::Group {
                combinator: *combinator,
                children,
            })
        }
        RuleNode::Condition {
            property_path,
            operator,
            ..
        } => match config.field(property_path) {
            None => {
                dropped.push(DroppedCondition {
                    path: property_path.clone(),
                    reason: RuleError::UnknownField {
                        path: property_path.clone(),
                    },
                });
                None
            }
            Some(field) if !field.operators.contains(operator) => {
                dropped.push(DroppedCondition {
                    path: property_path.clone(),
                    reason: RuleError::OperatorNotAllowed {
                        path: property_path.clone(),
                        operator: operator.symbol().to_string(),
                    },
                });
                None
            }
            Some(_) => Some(node.clone()),
        },
    }
}

/// Builds the starting tree for a dialog: a stored tree when one exists,
/// else a stored logic expression, else the empty matches-all group. The
/// result is always validated against the configuration; a stored expression
/// that fails to parse degrades to the empty tree with the failure recorded.
pub fn initial_tree(
    logic: Option<&LogicExpression>,
    tree: Option<&RuleNode>,
    config: &QueryConfig,
) -> CheckedTree {
    if let Some(tree) = tree {
        return check_tree(tree, config);
    }

    if let Some(logic) = logic {
        return match from_logic(logic) {
            Ok(tree) => check_tree(&tree, config),
            Err(reason) => CheckedTree {
                tree: RuleNode::empty(),
                dropped: vec![DroppedCondition {
                    path: String::new(),
                    reason,
                }],
            },
        };
    }

    CheckedTree {
        tree: RuleNode::empty(),
        dropped: Vec::new(),
    }
}

/// The outcome of a rule edit: the revalidated tree, its recomputed logic
/// and whether that logic differs from the previous value.
#[derive(Debug, Clone)]
pub struct RulesUpdate {
    pub tree: RuleNode,
    pub logic: Option<LogicExpression>,
    pub dropped: Vec<DroppedCondition>,
    /// False when the edit left the derived logic untouched, so downstream
    /// consumers can skip redundant re-queries.
    pub changed: bool,
}

/// Processes a user edit to the rule tree: revalidates against the
/// configuration and recomputes the logic expression.
pub fn on_change(
    tree: &RuleNode,
    config: &QueryConfig,
    previous: Option<&LogicExpression>,
) -> RulesUpdate {
    let checked = check_tree(tree, config);
    let logic = to_logic(&checked.tree);
    let changed = logic.as_ref() != previous;
    RulesUpdate {
        tree: checked.tree,
        logic,
        dropped: checked.dropped,
        changed,
    }
}
