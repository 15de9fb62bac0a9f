use sdui_protocol::ComponentType;
use thiserror::Error;

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors returned from a parse request
///
/// Any error aborts the whole request: no partial tree is returned and nothing
/// is written to the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input is not syntactically valid JSON
    #[error("Malformed JSON at line {line}, column {column}: {message}")]
    MalformedJson {
        message: String,
        line: usize,
        column: usize,
    },

    /// Valid JSON nested deeper than the decoder accepts
    #[error("Document nested too deeply at line {line}, column {column}")]
    TooDeep { line: usize, column: usize },

    /// No registered strategy claims the resolved type
    #[error("Unsupported component type: {0}")]
    UnsupportedType(ComponentType),

    /// A node has the wrong JSON shape
    #[error("Invalid node at {}: {reason}", display_path(.path))]
    InvalidNode { path: String, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The worker running an async parse stopped before finishing
    #[error("Parse interrupted: {0}")]
    Interrupted(String),
}

impl ParseError {
    /// Create an invalid node error
    pub fn invalid_node(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    #[must_use]
    pub const fn is_malformed_json(&self) -> bool {
        matches!(self, Self::MalformedJson { .. })
    }
}

/// Prefix serde_json uses for its nesting-depth failure
const RECURSION_LIMIT_MESSAGE: &str = "recursion limit exceeded";

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() && err.to_string().starts_with(RECURSION_LIMIT_MESSAGE) {
            return Self::TooDeep {
                line: err.line(),
                column: err.column(),
            };
        }
        Self::MalformedJson {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "document root"
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_json_keeps_position() {
        let err: ParseError = serde_json::from_str::<serde_json::Value>("{\"type\":")
            .unwrap_err()
            .into();
        match err {
            ParseError::MalformedJson { line, column, .. } => {
                assert_eq!(line, 1);
                assert!(column >= 8);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_deep_nesting_is_not_malformed() {
        let levels = 200;
        let doc = format!(
            "{}{{\"type\":\"text\"}}{}",
            "{\"type\":\"column\",\"children\":[".repeat(levels),
            "]}".repeat(levels)
        );
        let err: ParseError = serde_json::from_str::<serde_json::Value>(&doc)
            .unwrap_err()
            .into();
        assert!(matches!(err, ParseError::TooDeep { line: 1, .. }), "{err:?}");
        assert!(!err.is_malformed_json());
        assert!(err.to_string().starts_with("Document nested too deeply"));
    }

    #[test]
    fn test_invalid_node_display() {
        let root = ParseError::invalid_node("", "expected an object");
        assert_eq!(
            root.to_string(),
            "Invalid node at document root: expected an object"
        );
        let nested = ParseError::invalid_node("/children/1", "expected an object");
        assert_eq!(
            nested.to_string(),
            "Invalid node at /children/1: expected an object"
        );
    }
}
