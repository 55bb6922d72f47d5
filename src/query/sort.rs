use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sort direction for a find. `None` leaves the store's natural order in effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    None,
    Ascending,
    Descending,
}

/// A resolved sort: the field path and whether it runs descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

impl Sort {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    /// Compare two field values in this sort's direction.
    pub fn compare(&self, a: Option<&Value>, b: Option<&Value>) -> Ordering {
        let ordering = compare_values(a, b);
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Rank of a value in the cross-type order: missing < null < bool < number < string < array < object.
pub(crate) fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::Bool(_)) => 2,
        Some(Value::Number(_)) => 3,
        Some(Value::String(_)) => 4,
        Some(Value::Array(_)) => 5,
        Some(Value::Object(_)) => 6,
    }
}

/// Total order over optional JSON values, used by stores that sort in process.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => compare_numbers(x, y),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Array(x)), Some(Value::Array(y))) => {
            for (left, right) in x.iter().zip(y.iter()) {
                let ordering = compare_values(Some(left), Some(right));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        (Some(Value::Object(x)), Some(Value::Object(y))) => {
            for ((left_key, left), (right_key, right)) in x.iter().zip(y.iter()) {
                let ordering = left_key
                    .cmp(right_key)
                    .then_with(|| compare_values(Some(left), Some(right)));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

enum Numeric {
    Int(i128),
    Float(f64),
}

fn numeric(n: &serde_json::Number) -> Numeric {
    if let Some(i) = n.as_i64() {
        Numeric::Int(i.into())
    } else if let Some(u) = n.as_u64() {
        Numeric::Int(u.into())
    } else {
        Numeric::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn compare_numbers(x: &serde_json::Number, y: &serde_json::Number) -> Ordering {
    match (numeric(x), numeric(y)) {
        (Numeric::Int(a), Numeric::Int(b)) => a.cmp(&b),
        (Numeric::Float(a), Numeric::Float(b)) => a.total_cmp(&b),
        (Numeric::Int(a), Numeric::Float(b)) => compare_int_float(a, b),
        (Numeric::Float(a), Numeric::Int(b)) => compare_int_float(b, a).reverse(),
    }
}

// Exact: integers above 2^53 do not survive a round trip through f64.
fn compare_int_float(int: i128, float: f64) -> Ordering {
    // 2^127, the first power of two outside i128
    const BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

    if float.is_nan() || float >= BOUND {
        return Ordering::Less;
    }
    if float < -BOUND {
        return Ordering::Greater;
    }

    let whole = float.trunc();
    int.cmp(&(whole as i128)).then_with(|| {
        let fraction = float - whole;
        if fraction > 0.0 {
            Ordering::Less
        } else if fraction < 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}
