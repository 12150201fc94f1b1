//! MCP `search-memory` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchMemoryParams {
    #[schemars(description = "Search query text")]
    pub query: String,

    #[schemars(description = "Number of results to return (default: 5)")]
    pub top_k: Option<TopK>,
}

/// `top_k` as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum TopK {
    Number(f64),
    Text(String),
}

impl TopK {
    /// Effective result count. Fractions truncate, unparseable text falls back
    /// to `default`, and the result is clamped to `1..=max`.
    pub fn resolve(top_k: Option<&TopK>, default: usize, max: usize) -> usize {
        let requested = match top_k {
            Some(TopK::Number(n)) if n.is_finite() => n.trunc() as i64,
            Some(TopK::Text(s)) => s.trim().parse::<i64>().unwrap_or(default as i64),
            _ => default as i64,
        };
        requested.clamp(1, max.max(1) as i64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent() {
        assert_eq!(TopK::resolve(None, 5, 100), 5);
    }

    #[test]
    fn number_truncates() {
        assert_eq!(TopK::resolve(Some(&TopK::Number(3.9)), 5, 100), 3);
    }

    #[test]
    fn numeric_string_parses() {
        assert_eq!(TopK::resolve(Some(&TopK::Text("7".into())), 5, 100), 7);
        assert_eq!(TopK::resolve(Some(&TopK::Text("many".into())), 5, 100), 5);
    }

    #[test]
    fn clamps_to_range() {
        assert_eq!(TopK::resolve(Some(&TopK::Number(0.0)), 5, 100), 1);
        assert_eq!(TopK::resolve(Some(&TopK::Number(-4.0)), 5, 100), 1);
        assert_eq!(TopK::resolve(Some(&TopK::Number(5000.0)), 5, 100), 100);
    }

    #[test]
    fn deserializes_both_shapes() {
        let p: SearchMemoryParams =
            serde_json::from_str(r#"{"query": "q", "top_k": 2}"#).unwrap();
        assert!(matches!(p.top_k, Some(TopK::Number(n)) if n == 2.0));
        let p: SearchMemoryParams =
            serde_json::from_str(r#"{"query": "q", "top_k": "4"}"#).unwrap();
        assert!(matches!(p.top_k, Some(TopK::Text(ref s)) if s == "4"));
    }
}
