//! Error types for rendering and format operations

use thiserror::Error;

/// Errors raised while writing a XAML node stream.
///
/// `Protocol` marks a bug in a renderer (events issued out of order); the other
/// variants describe input or schema problems. None of them are retried: the
/// in-progress render is aborted and whatever the sink already received is
/// left as is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// Events were issued in an order the stream protocol forbids
    #[error("protocol violation in {operation}: {reason}")]
    Protocol {
        operation: &'static str,
        reason: &'static str,
    },

    /// The schema has no type with this name
    #[error("could not resolve xaml type '{0}'")]
    UnknownType(String),

    /// The type (or the owner of an attached member) has no such member
    #[error("type '{type_name}' has no member '{member}'")]
    UnknownMember { type_name: String, member: String },

    /// An items collection was requested on a type without a content property
    #[error("type '{0}' has no content property")]
    NoContentProperty(String),

    /// A style role name outside the closed role set
    #[error("unknown style role '{0}'")]
    UnknownStyleRole(String),

    /// A value could not be converted to the member's string form
    #[error("cannot convert {value} for member '{member}'")]
    Conversion { member: String, value: String },

    /// An embedded markup fragment uses constructs the passthrough does not replay
    #[error("unsupported markup fragment '{fragment}': {reason}")]
    UnsupportedFragment { fragment: String, reason: String },

    /// A handler was registered for a kind it cannot render
    #[error("handler registered for '{kind}' received a different node")]
    HandlerMismatch { kind: String },

    /// The configured base URI is not an absolute URI
    #[error("invalid base uri '{uri}': {reason}")]
    InvalidBaseUri { uri: String, reason: String },

    /// The sink could not produce its output
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl RenderError {
    pub(crate) fn protocol(operation: &'static str, reason: &'static str) -> Self {
        RenderError::Protocol { operation, reason }
    }

    pub(crate) fn unknown_member(type_name: &str, member: &str) -> Self {
        RenderError::UnknownMember {
            type_name: type_name.to_string(),
            member: member.to_string(),
        }
    }

    pub(crate) fn unsupported_fragment(fragment: &str, reason: impl Into<String>) -> Self {
        RenderError::UnsupportedFragment {
            fragment: fragment.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the requested operation
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    /// The render itself failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}
