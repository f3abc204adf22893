//! Answer normalization.
//!
//! Every equality check in the grader goes through [`normalize`] so that
//! formatting noise never turns a right answer into a wrong one.

use serde_json::Value;

/// Absolute tolerance for numeric comparisons.
pub const NUMERIC_TOLERANCE: f64 = 1e-4;

/// Canonical string form of a raw answer value.
///
/// `null` becomes `""`, strings are trimmed, booleans use their plain text
/// form, arrays and objects are rendered as compact JSON. Integral floats
/// drop the fractional part, so `9.0` and `9` normalize alike.
pub fn normalize(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
                // f64 Display prints -0.0 as "-0".
                if f == 0.0 {
                    "0".to_string()
                } else {
                    f.to_string()
                }
            }
            _ => n.to_string(),
        },
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Parse the longest numeric prefix of an answer as a finite number.
///
/// Leading whitespace and trailing text are ignored, so `"3.0 cm"` reads as
/// `3.0` and `"45°"` as `45.0`. The prefix is an optional sign, digits with an
/// optional fractional part, and an optional exponent. `None` when no digit
/// starts the answer.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |at: usize| {
        bytes
            .get(at..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let whole = digits_from(end);
    end += whole;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if whole > 0 || fraction > 0 {
            end += 1 + fraction;
        }
    }
    if whole == 0 && fraction == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Read a JSON value as a finite number, accepting numeric strings.
pub fn value_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Read a JSON value as an integer, accepting integral floats and numeric strings.
pub fn value_as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| parse_number(s).and_then(integral))
        }
        _ => None,
    }
}

fn integral(n: f64) -> Option<i64> {
    (n.fract() == 0.0 && n.abs() < i64::MAX as f64).then_some(n as i64)
}

/// Whether two numbers are equal within [`NUMERIC_TOLERANCE`].
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < NUMERIC_TOLERANCE
}

/// Remove every whitespace character.
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Whether a normalized answer is an empty JSON object or array literal.
pub fn is_empty_container(s: &str) -> bool {
    match serde_json::from_str::<Value>(s) {
        Ok(Value::Object(map)) => map.is_empty(),
        Ok(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}
