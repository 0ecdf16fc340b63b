//! Tagged parse outcomes.
//!
//! Validation failures are data, not control flow: callers pattern-match on
//! the variant instead of catching errors. Every variant carries a fully
//! usable value; the tags only say how much fidelity survived.

use serde::{Deserialize, Serialize};

/// Result of parsing a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "fidelity", content = "value")]
pub enum ParseOutcome<T> {
    /// The response validated against the full schema.
    Valid(T),
    /// Schema validation failed but individual fields were salvaged from
    /// the parsed JSON.
    StructuralFallback(T),
    /// Nothing parseable was found; the value is the terminal safety net
    /// built from the raw text.
    TerminalFallback(T),
}

impl<T> ParseOutcome<T> {
    /// The parsed value, regardless of fidelity.
    pub fn into_inner(self) -> T {
        match self {
            ParseOutcome::Valid(v)
            | ParseOutcome::StructuralFallback(v)
            | ParseOutcome::TerminalFallback(v) => v,
        }
    }

    /// Borrow the parsed value, regardless of fidelity.
    pub fn inner(&self) -> &T {
        match self {
            ParseOutcome::Valid(v)
            | ParseOutcome::StructuralFallback(v)
            | ParseOutcome::TerminalFallback(v) => v,
        }
    }

    /// Whether the response validated against the full schema.
    pub fn is_valid(&self) -> bool {
        matches!(self, ParseOutcome::Valid(_))
    }

    /// Whether any fallback layer produced the value.
    pub fn is_fallback(&self) -> bool {
        !self.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let outcome = ParseOutcome::Valid(7);
        assert!(outcome.is_valid());
        assert!(!outcome.is_fallback());
        assert_eq!(*outcome.inner(), 7);
        assert_eq!(outcome.into_inner(), 7);

        let fallback = ParseOutcome::TerminalFallback("x");
        assert!(fallback.is_fallback());
        assert_eq!(fallback.into_inner(), "x");
    }

    #[test]
    fn test_tagged_serialization() {
        let outcome = ParseOutcome::StructuralFallback(1);
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(json, r#"{"fidelity":"structural_fallback","value":1}"#);
    }
}
