use labgate_types::{INFINITE_SENTINEL, Metric};
use serde_json::Value;

/// `num / den`, or `f64::INFINITY` when the denominator is not positive.
pub fn guarded_ratio(num: f64, den: f64) -> f64 {
    if den <= 0.0 { f64::INFINITY } else { num / den }
}

/// Integral finite values become `Metric::Int`, everything else `Metric::Float`.
pub fn number_metric(value: f64) -> Metric {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        Metric::Int(value as i64)
    } else {
        Metric::Float(value)
    }
}

/// Three decimals, or the infinity sentinel.
pub fn fmt_number(value: f64) -> String {
    if value.is_infinite() && value > 0.0 {
        INFINITE_SENTINEL.to_string()
    } else if value.is_infinite() {
        format!("-{INFINITE_SENTINEL}")
    } else {
        format!("{value:.3}")
    }
}

/// Absent-like values (`null`, `false`, zero, empty string/list/object) are falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

pub fn join(items: &[String]) -> String {
    items.join(", ")
}
