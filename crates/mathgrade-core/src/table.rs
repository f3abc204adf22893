//! Table-input scoring with per-row partial credit.
//!
//! Canonical and submitted answers are JSON maps keyed by row index. Each row
//! earns a credit in `[0, 1]` and the question score is the mean over all
//! rows. The cell shape decides how a row is compared:
//!
//! 1. fractions (`num`/`den` or `n`/`d` on both sides), compared in lowest terms
//! 2. linear equations (`_equation: {a, b, c}`), any point on the line counts
//! 3. plain objects, credit per matching key
//! 4. scalars, numeric within tolerance or exact JSON equality

use serde_json::{Map, Value};

use crate::error::ScoreError;
use crate::model::AttemptRecord;
use crate::normalize::{approx_eq, normalize, value_as_integer, value_as_number};
use crate::traits::Scorer;

/// Partial-credit scorer for all table-input variants.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableScorer;

impl Scorer for TableScorer {
    fn name(&self) -> &'static str {
        "table"
    }

    fn score(
        &self,
        record: &AttemptRecord,
        submitted: &str,
        canonical: &str,
    ) -> Result<f64, ScoreError> {
        let strict = if submitted == canonical { 1.0 } else { 0.0 };

        let (expected, given) = match (
            serde_json::from_str::<Value>(canonical),
            serde_json::from_str::<Value>(submitted),
        ) {
            (Ok(expected), Ok(given)) => (expected, given),
            (Err(e), _) | (_, Err(e)) => {
                tracing::debug!(
                    "table answer is not JSON ({e}), falling back to strict comparison"
                );
                return Ok(strict);
            }
        };

        let total_rows = match &record.rows {
            Some(rows) => rows.len(),
            None => row_count(&expected),
        };
        if total_rows == 0 {
            return Ok(strict);
        }

        let credit: f64 = (0..total_rows)
            .map(|i| row_credit(row(&expected, i), row(&given, i)))
            .sum();

        Ok(credit / total_rows as f64)
    }
}

fn row_count(answer: &Value) -> usize {
    match answer {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.len(),
        _ => 0,
    }
}

fn row(answer: &Value, index: usize) -> Option<&Value> {
    let cell = match answer {
        Value::Object(map) => map.get(&index.to_string()),
        Value::Array(items) => items.get(index),
        _ => None,
    };
    cell.filter(|v| !v.is_null())
}

/// Credit for one row, comparing the canonical cell with the submitted one.
pub fn row_credit(expected: Option<&Value>, given: Option<&Value>) -> f64 {
    if let (Some(c), Some(u)) = (expected.and_then(fraction), given.and_then(fraction)) {
        return match (c.reduce(), u.reduce()) {
            (Some(c), Some(u)) if c == u => 1.0,
            _ => 0.0,
        };
    }

    match expected {
        Some(Value::Object(cell)) => {
            let Some(Value::Object(answer)) = given else {
                return 0.0;
            };
            match equation(cell) {
                Some(line) => {
                    if line.contains(answer) {
                        1.0
                    } else {
                        0.0
                    }
                }
                None => key_credit(cell, answer),
            }
        }
        _ => scalar_row(expected, given),
    }
}

/// Raw fraction parts, before parsing.
struct RawFraction<'a> {
    num: &'a Value,
    den: &'a Value,
}

fn fraction(cell: &Value) -> Option<RawFraction<'_>> {
    let map = cell.as_object()?;
    let num = map.get("num").or_else(|| map.get("n"))?;
    let den = map.get("den").or_else(|| map.get("d"))?;
    Some(RawFraction { num, den })
}

impl RawFraction<'_> {
    /// Lowest terms with the sign on the numerator. `None` if either part is
    /// not an integer or the denominator is zero. Widened to `i128` so that
    /// moving the sign of `i64::MIN` cannot overflow.
    fn reduce(&self) -> Option<(i128, i128)> {
        let num = i128::from(value_as_integer(self.num)?);
        let den = i128::from(value_as_integer(self.den)?);
        if den == 0 {
            return None;
        }
        let divisor = gcd(num.unsigned_abs(), den.unsigned_abs()).max(1) as i128;
        let (num, den) = (num / divisor, den / divisor);
        Some(if den < 0 { (-num, -den) } else { (num, den) })
    }
}

fn gcd(a: u128, b: u128) -> u128 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// The line `a·x + b·y = c`.
struct Line {
    a: f64,
    b: f64,
    c: f64,
}

fn equation(cell: &Map<String, Value>) -> Option<Line> {
    let descriptor = cell.get("_equation")?.as_object()?;
    Some(Line {
        a: value_as_number(descriptor.get("a")?)?,
        b: value_as_number(descriptor.get("b")?)?,
        c: value_as_number(descriptor.get("c")?)?,
    })
}

impl Line {
    fn contains(&self, point: &Map<String, Value>) -> bool {
        let x = point.get("x").and_then(value_as_number);
        let y = point.get("y").and_then(value_as_number);
        match (x, y) {
            (Some(x), Some(y)) => approx_eq(self.a * x + self.b * y, self.c),
            _ => false,
        }
    }
}

/// Fraction of the gradable keys the learner got right. Keys starting with
/// `_` carry validation metadata and are not graded.
fn key_credit(expected: &Map<String, Value>, given: &Map<String, Value>) -> f64 {
    let keys: Vec<&String> = expected.keys().filter(|k| !k.starts_with('_')).collect();
    if keys.is_empty() {
        return 1.0;
    }
    let matching = keys
        .iter()
        .filter(|k| {
            let answer = given.get(k.as_str()).unwrap_or(&Value::Null);
            normalize(&expected[k.as_str()]) == normalize(answer)
        })
        .count();
    matching as f64 / keys.len() as f64
}

fn scalar_row(expected: Option<&Value>, given: Option<&Value>) -> f64 {
    let numeric = (
        expected.and_then(value_as_number),
        given.and_then(value_as_number),
    );
    let matched = match numeric {
        (Some(c), Some(u)) => approx_eq(c, u),
        _ => expected == given,
    };
    if matched {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(rows: usize) -> AttemptRecord {
        AttemptRecord {
            kind: Some("tableInput".into()),
            rows: Some(vec![json!({}); rows]),
            ..Default::default()
        }
    }

    fn score(record: &AttemptRecord, submitted: Value, canonical: Value) -> f64 {
        TableScorer
            .score(record, &normalize(&submitted), &normalize(&canonical))
            .unwrap()
    }

    #[test]
    fn fraction_rows_compare_in_lowest_terms() {
        assert_eq!(
            row_credit(Some(&json!({"n": 1, "d": 2})), Some(&json!({"num": 2, "den": 4}))),
            1.0
        );
        assert_eq!(
            row_credit(Some(&json!({"num": "2", "den": "4"})), Some(&json!({"n": "1", "d": "2"}))),
            1.0
        );
        assert_eq!(
            row_credit(Some(&json!({"num": -1, "den": 2})), Some(&json!({"num": 1, "den": -2}))),
            1.0
        );
        assert_eq!(
            row_credit(Some(&json!({"num": 1, "den": 2})), Some(&json!({"num": 2, "den": 3}))),
            0.0
        );
        assert_eq!(
            row_credit(Some(&json!({"num": 1, "den": 2})), Some(&json!({"num": 1, "den": 0}))),
            0.0
        );
        assert_eq!(
            row_credit(Some(&json!({"num": 1, "den": 2})), Some(&json!({"num": "", "den": 2}))),
            0.0
        );
    }

    #[test]
    fn extreme_fraction_parts_do_not_overflow() {
        let min = json!({"num": i64::MIN, "den": -1});
        assert_eq!(row_credit(Some(&json!({"n": 1, "d": 2})), Some(&min)), 0.0);
        assert_eq!(row_credit(Some(&min), Some(&min)), 1.0);
        assert_eq!(
            row_credit(
                Some(&json!({"n": i64::MIN, "d": i64::MIN})),
                Some(&json!({"n": 1, "d": 1}))
            ),
            1.0
        );

        let record = AttemptRecord {
            topic: Some("Fractions".into()),
            kind: Some("tableInput".into()),
            rows: Some(vec![json!({})]),
            answer: json!(r#"{"0":{"n":1,"d":2}}"#),
            user_answer: json!({"0": {"num": i64::MIN, "den": -1}}),
            ..Default::default()
        };
        let report = crate::generate_report(&[record], "Grade 5");
        assert!(report.per_question_report[0].attempted);
        assert_eq!(report.per_question_report[0].score, 0.0);
    }

    #[test]
    fn equation_rows_accept_any_point_on_the_line() {
        let cell = json!({"x": 1, "y": 1, "_equation": {"a": 2, "b": 3, "c": 5}});
        assert_eq!(row_credit(Some(&cell), Some(&json!({"x": 1, "y": 1}))), 1.0);
        assert_eq!(row_credit(Some(&cell), Some(&json!({"x": "4", "y": "-1"}))), 1.0);
        assert_eq!(row_credit(Some(&cell), Some(&json!({"x": 0, "y": 0}))), 0.0);
        assert_eq!(row_credit(Some(&cell), Some(&json!({"x": "a", "y": 1}))), 0.0);
        assert_eq!(row_credit(Some(&cell), None), 0.0);
    }

    #[test]
    fn object_rows_earn_credit_per_key() {
        let cell = json!({"perimeter": 12, "area": 9});
        assert_eq!(row_credit(Some(&cell), Some(&json!({"perimeter": "12", "area": 8}))), 0.5);
        assert_eq!(row_credit(Some(&cell), Some(&json!({"perimeter": 12, "area": "9"}))), 1.0);
        assert_eq!(row_credit(Some(&cell), None), 0.0);
        assert_eq!(row_credit(Some(&cell), Some(&json!("12"))), 0.0);
    }

    #[test]
    fn integral_floats_match_integer_keys() {
        let cell = json!({"area": 9});
        assert_eq!(row_credit(Some(&cell), Some(&json!({"area": 9.0}))), 1.0);
        assert_eq!(row_credit(Some(&json!({"area": 9.0})), Some(&json!({"area": "9"}))), 1.0);
        assert_eq!(row_credit(Some(&cell), Some(&json!({"area": 9.5}))), 0.0);
    }

    #[test]
    fn underscore_keys_are_not_graded() {
        let cell = json!({"x": 3, "_hint": "count the squares"});
        assert_eq!(row_credit(Some(&cell), Some(&json!({"x": 3}))), 1.0);
        assert_eq!(row_credit(Some(&json!({"_meta": 1})), Some(&json!({}))), 1.0);
    }

    #[test]
    fn scalar_rows_use_tolerance_then_json_equality() {
        assert_eq!(row_credit(Some(&json!("0.50")), Some(&json!(0.5))), 1.0);
        assert_eq!(row_credit(Some(&json!("seven")), Some(&json!("seven"))), 1.0);
        assert_eq!(row_credit(Some(&json!("seven")), Some(&json!("Seven"))), 0.0);
        assert_eq!(row_credit(Some(&json!(3)), None), 0.0);
    }

    #[test]
    fn scalar_rows_read_leading_numbers() {
        assert_eq!(row_credit(Some(&json!(3)), Some(&json!("3 cm"))), 1.0);
        assert_eq!(row_credit(Some(&json!("45")), Some(&json!("45°"))), 1.0);
        assert_eq!(row_credit(Some(&json!(3)), Some(&json!("4 cm"))), 0.0);
    }

    #[test]
    fn total_is_mean_of_row_credits() {
        let record = table(4);
        let canonical = json!({"0": 1, "1": 2, "2": {"a": 1, "b": 2}, "3": {"n": 1, "d": 3}});
        let submitted = json!({"0": 1, "1": 5, "2": {"a": 1, "b": 0}, "3": {"n": 2, "d": 6}});
        assert_eq!(score(&record, submitted, canonical), (1.0 + 0.0 + 0.5 + 1.0) / 4.0);
    }

    #[test]
    fn row_count_falls_back_to_canonical_keys() {
        let record = AttemptRecord::default();
        let canonical = json!({"0": "4", "1": "9"});
        assert_eq!(score(&record, json!({"0": "4"}), canonical), 0.5);
    }

    #[test]
    fn array_answers_are_indexed_positionally() {
        let record = table(2);
        assert_eq!(score(&record, json!(["4", "8"]), json!(["4", "9"])), 0.5);
    }

    #[test]
    fn unparseable_answers_use_strict_equality() {
        let record = table(2);
        assert_eq!(TableScorer.score(&record, "4|9", "4|9").unwrap(), 1.0);
        assert_eq!(TableScorer.score(&record, "4|8", "4|9").unwrap(), 0.0);
        assert_eq!(TableScorer.score(&record, "{broken", r#"{"0":1}"#).unwrap(), 0.0);
    }

    #[test]
    fn empty_row_list_uses_strict_equality() {
        let record = table(0);
        assert_eq!(score(&record, json!({"0": 1}), json!({"0": 1})), 1.0);
        assert_eq!(score(&record, json!({"0": 2}), json!({"0": 1})), 0.0);
    }

    #[test]
    fn row_order_in_json_does_not_matter() {
        let record = table(3);
        let canonical = json!({"0": 1, "1": 2, "2": 3});
        let forward = TableScorer
            .score(&record, r#"{"0":1,"1":0,"2":3}"#, &normalize(&canonical))
            .unwrap();
        let backward = TableScorer
            .score(&record, r#"{"2":3,"1":0,"0":1}"#, &normalize(&canonical))
            .unwrap();
        assert_eq!(forward, backward);
        assert!((forward - 2.0 / 3.0).abs() < 1e-12);
    }
}
