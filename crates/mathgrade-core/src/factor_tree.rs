//! Factor-tree scoring.
//!
//! A factor tree decomposes a number into primes: leaves are the prime
//! factors and every internal node is the product of its children. Some
//! nodes are blanked (`isInput`) and the learner fills them in.
//!
//! A submission is correct when the filled tree is internally consistent
//! and its leaves are the same multiset as the canonical leaves. A different
//! but valid grouping (e.g. `36 = 4 × 9` instead of `36 = 6 × 6`) still scores 1.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::ScoreError;
use crate::model::{AttemptRecord, FactorTreeNode};
use crate::normalize::{normalize, value_as_integer};
use crate::traits::Scorer;

/// Binary scorer for factor-tree questions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactorTreeScorer;

impl Scorer for FactorTreeScorer {
    fn name(&self) -> &'static str {
        "factor-tree"
    }

    fn score(
        &self,
        record: &AttemptRecord,
        submitted: &str,
        canonical: &str,
    ) -> Result<f64, ScoreError> {
        let answers = parse_answers(submitted)?;

        let Some(tree) = canonical_tree(record, canonical)? else {
            tracing::debug!("factor tree question without a tree, comparing answer keys");
            return compare_answer_keys(canonical, &answers);
        };

        let filled = fill(&tree, &answers)?;
        if !products_hold(&filled) {
            return Ok(0.0);
        }

        let expected = canonical_leaves(&tree)?;
        let mut given = Vec::new();
        filled.collect_leaves(&mut given);
        given.sort_unstable();

        Ok(if given == expected { 1.0 } else { 0.0 })
    }
}

/// Submitted node values, keyed by node id.
fn parse_answers(submitted: &str) -> Result<HashMap<String, Value>, ScoreError> {
    let value: Value = serde_json::from_str(submitted)?;
    Ok(match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => HashMap::new(),
    })
}

/// The canonical tree: the auxiliary `tree` payload if present, otherwise the
/// canonical answer itself when it is shaped like a tree node.
fn canonical_tree(
    record: &AttemptRecord,
    canonical: &str,
) -> Result<Option<FactorTreeNode>, ScoreError> {
    if let Some(tree) = &record.tree {
        return Ok(Some(serde_json::from_value(tree.clone())?));
    }
    match serde_json::from_str::<Value>(canonical) {
        Ok(value) if value.get("val").is_some() => Ok(Some(serde_json::from_value(value)?)),
        _ => Ok(None),
    }
}

/// Without a tree the canonical answer has to be a map of node id to value,
/// and every entry has to match.
fn compare_answer_keys(
    canonical: &str,
    answers: &HashMap<String, Value>,
) -> Result<f64, ScoreError> {
    let expected: Value = serde_json::from_str(canonical)?;
    let Value::Object(expected) = expected else {
        return Err(ScoreError::MissingTree);
    };
    let all_match = expected.iter().all(|(id, val)| {
        let given = answers.get(id).unwrap_or(&Value::Null);
        normalize(val) == normalize(given)
    });
    Ok(if all_match { 1.0 } else { 0.0 })
}

/// A tree with every value resolved to an integer.
#[derive(Debug)]
struct FilledNode {
    label: String,
    val: i64,
    children: Vec<FilledNode>,
}

impl FilledNode {
    fn collect_leaves(&self, out: &mut Vec<i64>) {
        if self.children.is_empty() {
            out.push(self.val);
        } else {
            for child in &self.children {
                child.collect_leaves(out);
            }
        }
    }
}

/// Overlay the learner's answers onto the input nodes of a copy of the tree.
fn fill(node: &FactorTreeNode, answers: &HashMap<String, Value>) -> Result<FilledNode, ScoreError> {
    let label = node.label();
    let val = if node.is_input {
        let submitted = node
            .id
            .as_ref()
            .and_then(|id| answers.get(&id.to_string()))
            .filter(|v| !normalize(v).is_empty())
            .ok_or_else(|| ScoreError::MissingInput {
                node: label.clone(),
            })?;
        value_as_integer(submitted).ok_or_else(|| ScoreError::InvalidNodeValue {
            node: label.clone(),
        })?
    } else {
        value_as_integer(&node.val).ok_or_else(|| ScoreError::InvalidNodeValue {
            node: label.clone(),
        })?
    };

    let children = node
        .children()
        .iter()
        .map(|child| fill(child, answers))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FilledNode {
        label,
        val,
        children,
    })
}

/// Every internal node must equal the product of its children.
fn products_hold(node: &FilledNode) -> bool {
    if node.children.is_empty() {
        return true;
    }
    let product = node
        .children
        .iter()
        .try_fold(1i64, |acc, child| acc.checked_mul(child.val));
    match product {
        Some(p) if p == node.val => node.children.iter().all(products_hold),
        Some(_) => false,
        None => {
            tracing::debug!(
                "{}",
                ScoreError::ProductOverflow {
                    node: node.label.clone()
                }
            );
            false
        }
    }
}

/// Sorted leaf values of the canonical tree.
fn canonical_leaves(node: &FactorTreeNode) -> Result<Vec<i64>, ScoreError> {
    fn walk(node: &FactorTreeNode, out: &mut Vec<i64>) -> Result<(), ScoreError> {
        if node.is_leaf() {
            let val = value_as_integer(&node.val).ok_or_else(|| ScoreError::InvalidNodeValue {
                node: node.label(),
            })?;
            out.push(val);
            return Ok(());
        }
        node.children().iter().try_for_each(|child| walk(child, out))
    }

    let mut leaves = Vec::new();
    walk(node, &mut leaves)?;
    leaves.sort_unstable();
    Ok(leaves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// 36 = 6 × 6, 6 = 2 × 3. Inner nodes b and c are blanked.
    fn tree_36() -> Value {
        json!({
            "id": "root", "val": 36, "children": [
                {"id": "b", "val": 6, "isInput": true, "children": [
                    {"id": "d", "val": 2}, {"id": "e", "val": 3}
                ]},
                {"id": "c", "val": 6, "isInput": true, "children": [
                    {"id": "f", "val": 2}, {"id": "g", "val": 3, "isInput": true}
                ]}
            ]
        })
    }

    fn record(tree: Value) -> AttemptRecord {
        AttemptRecord {
            kind: Some("factorTree".into()),
            tree: Some(tree),
            answer: json!(r#"{"b":"6","c":"6","g":"3"}"#),
            ..Default::default()
        }
    }

    fn score(record: &AttemptRecord, submitted: Value) -> Result<f64, ScoreError> {
        FactorTreeScorer.score(record, &normalize(&submitted), &normalize(&record.answer))
    }

    #[test]
    fn canonical_fill_scores_one() {
        let rec = record(tree_36());
        assert_eq!(score(&rec, json!({"b": "6", "c": "6", "g": "3"})).unwrap(), 1.0);
    }

    #[test]
    fn product_mismatch_scores_zero() {
        let rec = record(tree_36());
        assert_eq!(score(&rec, json!({"b": "6", "c": "7", "g": "3"})).unwrap(), 0.0);
    }

    #[test]
    fn wrong_leaf_multiset_scores_zero() {
        // 12 = 3 × (1 × 4): every product holds, but {1, 3, 4} are not the primes {2, 2, 3}.
        let tree = json!({
            "id": "r", "val": 12, "children": [
                {"id": "a", "val": 3, "isInput": true},
                {"id": "b", "val": 4, "children": [
                    {"id": "b1", "val": 2, "isInput": true},
                    {"id": "b2", "val": 2, "isInput": true}
                ]}
            ]
        });
        let mut rec = record(tree);
        rec.answer = json!(r#"{"a":"3","b1":"2","b2":"2"}"#);
        assert_eq!(score(&rec, json!({"a": "3", "b1": "2", "b2": "2"})).unwrap(), 1.0);
        assert_eq!(score(&rec, json!({"a": "3", "b1": "1", "b2": "4"})).unwrap(), 0.0);
    }

    #[test]
    fn alternative_grouping_is_accepted() {
        // Canonical: 12 = 2 × 6, 6 = 2 × 3.
        // Learner supplies 12 = 3 × 4 with 4 = 2 × 2; same primes {2, 2, 3}.
        let tree = json!({
            "id": "r", "val": 12, "children": [
                {"id": "a", "val": 2, "isInput": true},
                {"id": "b", "val": 6, "isInput": true, "children": [
                    {"id": "b1", "val": 2, "isInput": true},
                    {"id": "b2", "val": 3, "isInput": true}
                ]}
            ]
        });
        let rec = record(tree);
        let alternative = json!({"a": "3", "b": "4", "b1": "2", "b2": "2"});
        assert_eq!(score(&rec, alternative).unwrap(), 1.0);
    }

    #[test]
    fn blank_input_node_fails_closed() {
        let rec = record(tree_36());
        let err = score(&rec, json!({"b": "6", "c": ""})).unwrap_err();
        assert!(matches!(err, ScoreError::MissingInput { ref node } if node == "c"));
    }

    #[test]
    fn non_numeric_input_fails_closed() {
        let rec = record(tree_36());
        let err = score(&rec, json!({"b": "six", "c": "6", "g": "3"})).unwrap_err();
        assert!(matches!(err, ScoreError::InvalidNodeValue { .. }));
    }

    #[test]
    fn malformed_submission_is_an_error() {
        let rec = record(tree_36());
        let err = FactorTreeScorer
            .score(&rec, "{not json", &normalize(&rec.answer))
            .unwrap_err();
        assert!(matches!(err, ScoreError::MalformedJson(_)));
    }

    #[test]
    fn overflowing_product_scores_zero() {
        let tree = json!({
            "id": "r", "val": 4, "children": [
                {"id": "a", "val": 2, "isInput": true},
                {"id": "b", "val": 2, "isInput": true}
            ]
        });
        let rec = record(tree);
        let huge = i64::MAX.to_string();
        assert_eq!(score(&rec, json!({"a": huge, "b": "2"})).unwrap(), 0.0);
    }

    #[test]
    fn tree_embedded_in_canonical_answer() {
        let rec = AttemptRecord {
            kind: Some("factorTree".into()),
            answer: json!(tree_36().to_string()),
            ..Default::default()
        };
        assert_eq!(score(&rec, json!({"b": 6, "c": 6, "g": 3})).unwrap(), 1.0);
    }

    #[test]
    fn without_tree_every_key_must_match() {
        let rec = AttemptRecord {
            kind: Some("factorTree".into()),
            answer: json!(r#"{"b":"6","c":"6"}"#),
            ..Default::default()
        };
        assert_eq!(score(&rec, json!({"b": "6", "c": " 6"})).unwrap(), 1.0);
        assert_eq!(score(&rec, json!({"b": "6"})).unwrap(), 0.0);
    }

    #[test]
    fn scalar_answer_without_tree_is_an_error() {
        let rec = AttemptRecord {
            kind: Some("factorTree".into()),
            answer: json!("36"),
            ..Default::default()
        };
        let err = score(&rec, json!({"a": "6"})).unwrap_err();
        assert!(matches!(err, ScoreError::MissingTree));
    }
}
