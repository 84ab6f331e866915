use super::{Combinator, Operator, RuleNode};
use serde_json::Value;

/// Formats rule trees into human-readable summaries.
pub struct RuleFormatter;

impl RuleFormatter {
    /// Formats a tree into a single-line summary, e.g.
    /// `$.qty > 5 AND (tagId == 2 OR reserved == true)`.
    pub fn format_tree(tree: &RuleNode) -> String {
        if tree.is_empty() {
            return "<matches all rows>".to_string();
        }
        Self::format_recursive(tree, 0)
    }

    /// Recursively formats the tree, adding parentheses only when a group
    /// binds more loosely than its parent.
    fn format_recursive(node: &RuleNode, parent_precedence: u8) -> String {
        match node {
            RuleNode::Group {
                combinator,
                children,
            } => {
                let current_precedence = Self::precedence(*combinator);
                let parts: Vec<String> = children
                    .iter()
                    .filter(|child| !child.is_empty())
                    .map(|child| Self::format_recursive(child, current_precedence))
                    .collect();
                let separator = match combinator {
                    Combinator::And => " AND ",
                    Combinator::Or => " OR ",
                };
                let joined = parts.join(separator);
                if current_precedence < parent_precedence && parts.len() > 1 {
                    format!("({joined})")
                } else {
                    joined
                }
            }
            RuleNode::Condition {
                property_path,
                operator,
                operand,
            } => match operator {
                Operator::IsNull | Operator::IsNotNull => {
                    format!("{property_path} {}", operator.symbol())
                }
                _ => format!(
                    "{property_path} {} {}",
                    operator.symbol(),
                    Self::format_operand(operand.as_ref())
                ),
            },
        }
    }

    fn precedence(combinator: Combinator) -> u8 {
        match combinator {
            Combinator::And => 2,
            Combinator::Or => 1,
        }
    }

    fn format_operand(operand: Option<&Value>) -> String {
        match operand {
            None | Some(Value::Null) => "null".to_string(),
            Some(Value::String(text)) => format!("'{text}'"),
            Some(other) => other.to_string(),
        }
    }
}
