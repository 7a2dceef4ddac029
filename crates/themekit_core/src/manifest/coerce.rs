//! Legacy string-to-boolean coercion.
//!
//! Older manifests spell booleans as the strings `"true"` and `"false"`.
//! Only those two exact literals are recognized; `"TRUE"` or `"1"` stay
//! strings.

use serde_json::{Map, Value};

/// Literal accepted as boolean `true`.
pub const TRUE_LITERAL: &str = "true";
/// Literal accepted as boolean `false`.
pub const FALSE_LITERAL: &str = "false";

/// Resolves a manifest value to a boolean when it is one.
///
/// Returns `None` for every value that is neither a JSON boolean nor one of
/// the two legacy literals.
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(raw) if raw == TRUE_LITERAL => Some(true),
        Value::String(raw) if raw == FALSE_LITERAL => Some(false),
        _ => None,
    }
}

/// Replaces every top-level `"true"` string in `args` with boolean `true`.
///
/// Returns the keys that were rewritten, in argument order.
pub fn coerce_true_literals(args: &mut Map<String, Value>) -> Vec<String> {
    let mut rewritten = Vec::new();
    for (key, value) in args.iter_mut() {
        if value.as_str() == Some(TRUE_LITERAL) {
            *value = Value::Bool(true);
            rewritten.push(key.clone());
        }
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use super::{coerce_bool, coerce_true_literals};
    use serde_json::{json, Value};

    #[test]
    fn coerces_booleans_and_legacy_literals() {
        assert_eq!(coerce_bool(&json!(true)), Some(true));
        assert_eq!(coerce_bool(&json!(false)), Some(false));
        assert_eq!(coerce_bool(&json!("true")), Some(true));
        assert_eq!(coerce_bool(&json!("false")), Some(false));
    }

    #[test]
    fn leaves_other_values_undecided() {
        assert_eq!(coerce_bool(&json!("TRUE")), None);
        assert_eq!(coerce_bool(&json!(1)), None);
        assert_eq!(coerce_bool(&json!(null)), None);
        assert_eq!(coerce_bool(&json!(["true"])), None);
    }

    #[test]
    fn rewrites_only_top_level_true_literals() {
        let mut args = json!({
            "public": "true",
            "has_archive": "false",
            "rewrite": { "with_front": "true" },
            "menu_position": 5
        })
        .as_object()
        .cloned()
        .expect("object literal");

        let rewritten = coerce_true_literals(&mut args);

        assert_eq!(rewritten, vec!["public".to_string()]);
        assert_eq!(args["public"], Value::Bool(true));
        assert_eq!(args["has_archive"], json!("false"));
        assert_eq!(args["rewrite"]["with_front"], json!("true"));
    }
}
