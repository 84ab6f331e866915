use super::{Combinator, Operator, RuleNode};
use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// The portable, JsonLogic-compatible predicate exchanged with the remote
/// store and persisted inside filter and task configurations. Conditions
/// reference fields as `{"var": path}`; groups nest under `and`/`or`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicExpression(Value);

impl LogicExpression {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for LogicExpression {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for LogicExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Converts a rule tree into its portable logic form. An empty tree has no
/// predicate and yields `None`, which matches every row.
pub fn to_logic(tree: &RuleNode) -> Option<LogicExpression> {
    node_to_value(tree).map(LogicExpression)
}

fn node_to_value(node: &RuleNode) -> Option<Value> {
    match node {
        RuleNode::Group {
            combinator,
            children,
        } => {
            // Empty subtrees contribute no predicate.
            let parts: Vec<Value> = children.iter().filter_map(node_to_value).collect();
            if parts.is_empty() {
                return None;
            }
            let key = match combinator {
                Combinator::And => "and",
                Combinator::Or => "or",
            };
            Some(json!({ key: parts }))
        }
        RuleNode::Condition {
            property_path,
            operator,
            operand,
        } => {
            let var = json!({ "var": property_path });
            let operand = operand.clone().unwrap_or(Value::Null);
            Some(match operator {
                Operator::Equal => json!({ "==": [var, operand] }),
                Operator::NotEqual => json!({ "!=": [var, operand] }),
                Operator::Greater => json!({ ">": [var, operand] }),
                Operator::GreaterOrEqual => json!({ ">=": [var, operand] }),
                Operator::Less => json!({ "<": [var, operand] }),
                Operator::LessOrEqual => json!({ "<=": [var, operand] }),
                Operator::In => json!({ "in": [var, operand] }),
                Operator::NotIn => json!({ "!": { "in": [var, operand] } }),
                Operator::IsNull => json!({ "==": [var, Value::Null] }),
                Operator::IsNotNull => json!({ "!=": [var, Value::Null] }),
            })
        }
    }
}

/// Parses a portable logic expression back into a rule tree. The result is
/// structurally canonical: an equality against `null` becomes an
/// `IsNull`/`IsNotNull` condition, so `to_logic(from_logic(L)) == L` for any
/// expression this module emits.
pub fn from_logic(logic: &LogicExpression) -> Result<RuleNode, RuleError> {
    value_to_node(logic.as_value())
}

fn value_to_node(value: &Value) -> Result<RuleNode, RuleError> {
    let (key, arguments) = unwrap_operator(value)?;

    match key {
        "and" | "or" => {
            let children = arguments
                .as_array()
                .ok_or_else(|| {
                    RuleError::MalformedLogic(format!("'{key}' expects an array of children"))
                })?
                .iter()
                .map(value_to_node)
                .collect::<Result<Vec<_>, _>>()?;
            let combinator = if key == "and" {
                Combinator::And
            } else {
                Combinator::Or
            };
            Ok(RuleNode::Group {
                combinator,
                children,
            })
        }
        "!" => {
            // Negation only wraps membership tests in this dialect.
            let (inner_key, inner_arguments) = unwrap_operator(arguments)?;
            if inner_key != "in" {
                return Err(RuleError::MalformedLogic(format!(
                    "negation of '{inner_key}' is not supported"
                )));
            }
            let (path, operand) = split_condition(inner_arguments)?;
            Ok(RuleNode::condition(path, Operator::NotIn, operand))
        }
        "==" | "!=" | ">" | ">=" | "<" | "<=" | "in" => {
            let (path, operand) = split_condition(arguments)?;
            let operator = match (key, &operand) {
                ("==", None) => Operator::IsNull,
                ("!=", None) => Operator::IsNotNull,
                ("==", Some(_)) => Operator::Equal,
                ("!=", Some(_)) => Operator::NotEqual,
                (">", _) => Operator::Greater,
                (">=", _) => Operator::GreaterOrEqual,
                ("<", _) => Operator::Less,
                ("<=", _) => Operator::LessOrEqual,
                ("in", _) => Operator::In,
                _ => unreachable!("operator key already matched"),
            };
            let operand = match operator {
                Operator::IsNull | Operator::IsNotNull => None,
                _ => operand,
            };
            Ok(RuleNode::condition(path, operator, operand))
        }
        other => Err(RuleError::MalformedLogic(format!(
            "unsupported operator '{other}'"
        ))),
    }
}

/// Splits a single-key operator object into its key and arguments.
fn unwrap_operator(value: &Value) -> Result<(&str, &Value), RuleError> {
    let object = value
        .as_object()
        .ok_or_else(|| RuleError::MalformedLogic(format!("expected an operator object, got {value}")))?;
    if object.len() != 1 {
        return Err(RuleError::MalformedLogic(
            "operator objects must have exactly one key".to_string(),
        ));
    }
    match object.iter().next() {
        Some((key, arguments)) => Ok((key.as_str(), arguments)),
        None => Err(RuleError::MalformedLogic(
            "operator objects must have exactly one key".to_string(),
        )),
    }
}

/// Splits comparison arguments `[{"var": path}, operand]` into the field
/// path and the operand (`None` for a JSON `null`).
fn split_condition(arguments: &Value) -> Result<(String, Option<Value>), RuleError> {
    let pair = arguments
        .as_array()
        .filter(|array| array.len() == 2)
        .ok_or_else(|| {
            RuleError::MalformedLogic("comparisons expect [field, operand] arguments".to_string())
        })?;

    let path = pair[0]
        .as_object()
        .and_then(|object| object.get("var"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            RuleError::MalformedLogic(format!(
                "comparison field must be a {{\"var\": path}} reference, got {}",
                pair[0]
            ))
        })?;

    let operand = match &pair[1] {
        Value::Null => None,
        other => Some(other.clone()),
    };

    Ok((path.to_string(), operand))
}
