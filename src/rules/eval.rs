use super::{Combinator, Operator, RuleNode};
use crate::model::DataRow;
use serde_json::Value;
use std::cmp::Ordering;

/// Decides whether a data row satisfies a rule tree.
///
/// Semantics mirror how the remote store filters: an empty subtree matches
/// every row, `is null` matches both a JSON `null` and an absent property
/// path, and comparisons between incomparable values are false rather than
/// errors.
pub fn matches_row(tree: &RuleNode, row: &DataRow) -> bool {
    match tree {
        RuleNode::Group {
            combinator,
            children,
        } => {
            let effective: Vec<&RuleNode> =
                children.iter().filter(|child| !child.is_empty()).collect();
            if effective.is_empty() {
                return true;
            }
            match combinator {
                Combinator::And => effective.iter().all(|child| matches_row(child, row)),
                Combinator::Or => effective.iter().any(|child| matches_row(child, row)),
            }
        }
        RuleNode::Condition {
            property_path,
            operator,
            operand,
        } => evaluate_condition(
            row.field_value(property_path).as_ref(),
            *operator,
            operand.as_ref(),
        ),
    }
}

/// Filters rows down to those satisfying the tree.
pub fn matching_rows<'a>(tree: &RuleNode, rows: &'a [DataRow]) -> Vec<&'a DataRow> {
    rows.iter().filter(|row| matches_row(tree, row)).collect()
}

fn evaluate_condition(actual: Option<&Value>, operator: Operator, operand: Option<&Value>) -> bool {
    let is_null = matches!(actual, None | Some(Value::Null));

    match operator {
        Operator::IsNull => is_null,
        Operator::IsNotNull => !is_null,
        Operator::Equal => match operand {
            None | Some(Value::Null) => is_null,
            Some(expected) => actual.is_some_and(|value| json_equal(value, expected)),
        },
        Operator::NotEqual => !evaluate_condition(actual, Operator::Equal, operand),
        Operator::Greater => ordering_matches(actual, operand, Ordering::is_gt),
        Operator::GreaterOrEqual => ordering_matches(actual, operand, Ordering::is_ge),
        Operator::Less => ordering_matches(actual, operand, Ordering::is_lt),
        Operator::LessOrEqual => ordering_matches(actual, operand, Ordering::is_le),
        Operator::In => match (actual, operand) {
            (Some(value), Some(Value::Array(candidates))) => candidates
                .iter()
                .any(|candidate| json_equal(value, candidate)),
            _ => false,
        },
        Operator::NotIn => !evaluate_condition(actual, Operator::In, operand),
    }
}

fn ordering_matches(
    actual: Option<&Value>,
    operand: Option<&Value>,
    accept: fn(Ordering) -> bool,
) -> bool {
    match (actual, operand) {
        (Some(value), Some(expected)) => json_compare(value, expected).is_some_and(accept),
        _ => false,
    }
}

/// Equality that treats all JSON number representations uniformly, so `1`
/// and `1.0` compare equal.
fn json_equal(left: &Value, right: &Value) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => left == right,
    }
}

/// Orders numbers numerically and strings lexicographically (which also
/// covers ISO-formatted dates and times); everything else is incomparable.
fn json_compare(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) {
        return a.partial_cmp(&b);
    }
    if let (Some(a), Some(b)) = (left.as_str(), right.as_str()) {
        return Some(a.cmp(b));
    }
    None
}
