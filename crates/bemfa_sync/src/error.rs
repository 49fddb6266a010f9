/// Faults raised while encoding entity state or decoding an inbound message.
///
/// A missing optional attribute is never an error: generators report "no value" instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("Message has no power field")]
    EmptyMessage,

    #[error("No {domain} resolver accepts a message with {count} fields")]
    FieldCount { domain: &'static str, count: usize },

    #[error("Field {index} is not an integer: {token:?}")]
    InvalidNumber { index: usize, token: String },

    #[error("Packed RGB value out of range: {0}")]
    ColorOutOfRange(i64),

    #[error("Division by zero converting {key}")]
    DivisionByZero { key: &'static str },

    #[error("Missing attribute: {0}")]
    MissingAttribute(&'static str),

    #[error("Attribute {key} is malformed, expected {expected}")]
    MalformedAttribute {
        key: &'static str,
        expected: &'static str,
    },

    #[error("Invalid topic name: {0:?}")]
    InvalidTopic(String),

    #[error("No sync adapter registered for domain: {0}")]
    UnknownDomain(String),
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
