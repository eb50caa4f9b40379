//! Error types for query composition with actionable messages.
//!
//! Every failure raised by this crate is a programming or configuration error
//! detected synchronously at the point of misuse. Errors carry:
//! - An error code for programmatic handling
//! - Suggestions for fixing the problem
//! - Context about the operation and field involved
//!
//! # Error Codes
//!
//! Error codes follow a pattern: C{category}{number}
//! - 1xxx: Filter errors (unknown kind, conflicts, bad nested items)
//! - 2xxx: Query configuration errors (sort mode, depth operator)
//! - 3xxx: Content store errors
//! - 7xxx: Configuration file errors
//!
//! ```rust
//! use canopy_query::{ErrorCode, QueryError};
//!
//! let err = QueryError::filter_type("decimal");
//! assert_eq!(err.code, ErrorCode::FilterType);
//! assert_eq!(err.code.code(), "C1001");
//! assert!(err.to_string().contains("decimal"));
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Filter errors (1xxx)
    /// Unknown symbolic filter kind (C1001).
    FilterType = 1001,
    /// Two different extended filters merged into one slot (C1002).
    ExtendedFilterConflict = 1002,
    /// Nested composite with a condition other than and/or/merge (C1003).
    UnknownFilterCondition = 1003,
    /// Nested item that is neither an entry nor a composite (C1004).
    UnsupportedFilterType = 1004,
    /// Content class could not be loaded for filter definitions (C1005).
    UnknownContentClass = 1005,

    // Query configuration errors (2xxx)
    /// Unrecognized sort resolution mode (C2001).
    UnsupportedSortMode = 2001,
    /// Depth comparison operator outside the supported set (C2002).
    InvalidDepthOperator = 2002,
    /// Unrecognized filter emission mode (C2003).
    UnsupportedFilterMode = 2003,
    /// Invalid parameter value (C2004).
    InvalidParameter = 2004,

    // Store errors (3xxx)
    /// The store returned no result object at all (C3001).
    EmptyStoreResult = 3001,
    /// The store collaborator failed (C3002).
    StoreFailure = 3002,

    // Configuration errors (7xxx)
    /// Invalid configuration (C7001).
    InvalidConfiguration = 7001,
    /// Missing configuration (C7002).
    MissingConfiguration = 7002,
}

impl ErrorCode {
    /// Get the error code string (e.g., "C1001").
    pub fn code(&self) -> String {
        format!("C{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::FilterType => "Unsupported filter type",
            Self::ExtendedFilterConflict => "Extended filter conflict",
            Self::UnknownFilterCondition => "Unknown filter condition",
            Self::UnsupportedFilterType => "Unsupported nested filter item",
            Self::UnknownContentClass => "Unknown content class",
            Self::UnsupportedSortMode => "Unsupported sort mode",
            Self::InvalidDepthOperator => "Invalid depth operator",
            Self::UnsupportedFilterMode => "Unsupported filter mode",
            Self::InvalidParameter => "Invalid parameter",
            Self::EmptyStoreResult => "Empty store result",
            Self::StoreFailure => "Content store failure",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::MissingConfiguration => "Missing configuration",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Suggestion for fixing an error.
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The suggestion text.
    pub text: String,
    /// Optional code example.
    pub code: Option<String>,
}

impl Suggestion {
    /// Create a new suggestion.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            code: None,
        }
    }

    /// Add a code example.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that was being performed.
    pub operation: Option<String>,
    /// The filter or field involved.
    pub field: Option<String>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<Suggestion>,
    /// Help text.
    pub help: Option<String>,
}

/// Errors that can occur while composing or executing a query.
#[derive(Error, Debug)]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add context about the operation.
    pub fn with_context(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestions.push(Suggestion::new(suggestion));
        self
    }

    /// Add a code suggestion.
    pub fn with_code_suggestion(mut self, text: impl Into<String>, code: impl Into<String>) -> Self {
        self.context.suggestions.push(Suggestion::new(text).with_code(code));
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// Set the field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.context.field = Some(field.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// Unknown symbolic filter kind passed to `define_filter`.
    pub fn filter_type(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self::new(ErrorCode::FilterType, format!("Unsupported filter type: {}", kind))
            .with_suggestion("Use one of the symbolic kinds 'int', 'bool' or 'string'")
            .with_code_suggestion(
                "Or pass a filter instance directly",
                "query.define_filter(\"year\", IntegerFieldFilter::new(\"year\"), None)?",
            )
    }

    /// A content class needed by `load_filters` could not be fetched.
    pub fn unknown_content_class(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self::new(
            ErrorCode::UnknownContentClass,
            format!("Failed to fetch filters for class: {}", identifier),
        )
        .with_field(&identifier)
        .with_suggestion("Verify the class identifier exists in the class catalog")
    }

    /// Two extended filters with different identifiers were merged.
    pub fn extended_filter_conflict(incoming: impl Into<String>, existing: impl Into<String>) -> Self {
        let incoming = incoming.into();
        let existing = existing.into();
        Self::new(
            ErrorCode::ExtendedFilterConflict,
            format!(
                "Cannot set extended filter '{}', it has already been defined with a different ID: '{}'",
                incoming, existing
            ),
        )
        .with_field(&incoming)
        .with_help("Only one kind of extended filter can be active; use nested filters to combine several")
    }

    /// A nested composite carried an unknown condition.
    pub fn unknown_filter_condition(condition: impl Into<String>) -> Self {
        let condition = condition.into();
        Self::new(
            ErrorCode::UnknownFilterCondition,
            format!("Unknown filter condition '{}'", condition),
        )
        .with_suggestion("Use 'and', 'or' or 'merge'")
    }

    /// A nested filter item had an unsupported shape.
    pub fn unsupported_filter_type(description: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UnsupportedFilterType,
            format!("Unsupported filter type: {}", description.into()),
        )
        .with_suggestion("Pass a [field, value] pair, an attribute entry or a composite with 'condition' and 'nested'")
    }

    /// The query set was configured with an unknown sort mode.
    pub fn unsupported_sort_mode(mode: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UnsupportedSortMode,
            format!("Unsupported sort-mode: {}", mode.into()),
        )
        .with_suggestion("Use 'property' or 'query'")
    }

    /// The query set was configured with an unknown filter mode.
    pub fn unsupported_filter_mode(mode: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UnsupportedFilterMode,
            format!("Unsupported filter-mode: {}", mode.into()),
        )
        .with_suggestion("Use 'attribute' or 'nested'")
    }

    /// Depth operator outside the supported set.
    pub fn invalid_depth_operator(operator: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidDepthOperator,
            format!("Invalid depth operator '{}'", operator.into()),
        )
        .with_suggestion("Use one of 'eq', 'lt', 'le', 'gt', 'ge'")
    }

    /// Invalid parameter value.
    pub fn invalid_parameter(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            ErrorCode::InvalidParameter,
            format!("Invalid value for '{}': {}", field, message.into()),
        )
        .with_field(field)
    }

    /// The item query returned no result object.
    pub fn empty_store_result() -> Self {
        Self::new(
            ErrorCode::EmptyStoreResult,
            "No item list returned from sub-tree query",
        )
        .with_help("An empty item list is a valid result; this error means the store returned nothing at all")
    }

    /// The store collaborator reported a failure.
    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreFailure, message)
    }

    /// Invalid configuration.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfiguration, message)
    }

    /// Missing configuration value.
    pub fn missing_configuration(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(
            ErrorCode::MissingConfiguration,
            format!("Missing configuration value '{}'", key),
        )
        .with_field(key)
    }

    // ============== Error Checks ==============

    /// Check if this error originates from filter composition.
    pub fn is_filter_error(&self) -> bool {
        (self.code as u16) / 1000 == 1
    }

    /// Check if this is a query or file configuration error.
    pub fn is_configuration_error(&self) -> bool {
        matches!((self.code as u16) / 1000, 2 | 7)
    }

    /// Check if this error came from the content store.
    pub fn is_store_error(&self) -> bool {
        (self.code as u16) / 1000 == 3
    }

    /// Get the error code.
    pub fn error_code(&self) -> &ErrorCode {
        &self.code
    }

    /// Display the full error with all context and suggestions.
    pub fn display_full(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error [{}]: {}\n", self.code.code(), self.message));

        if let Some(ref op) = self.context.operation {
            output.push_str(&format!("  → While: {}\n", op));
        }
        if let Some(ref field) = self.context.field {
            output.push_str(&format!("  → Field: {}\n", field));
        }

        if !self.context.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for (i, suggestion) in self.context.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion.text));
                if let Some(ref code) = suggestion.code {
                    output.push_str(&format!("     ```\n     {}\n     ```\n", code.replace('\n', "\n     ")));
                }
            }
        }

        if let Some(ref help) = self.context.help {
            output.push_str(&format!("\nHelp: {}\n", help));
        }

        output
    }
}

/// Helper for creating errors with context.
#[macro_export]
macro_rules! query_error {
    ($code:expr, $msg:expr) => {
        $crate::error::QueryError::new($code, $msg)
    };
    ($code:expr, $msg:expr, $($key:ident = $value:expr),+ $(,)?) => {{
        let mut err = $crate::error::QueryError::new($code, $msg);
        $(
            err = err.$key($value);
        )+
        err
    }};
}
