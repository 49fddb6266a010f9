//! bemfa wire messages.
//!
//! A message is a short list of scalar fields joined by `#`, e.g. `on#50#3000`.
//! Position carries meaning, so a missing field in the middle of a message is
//! sent as an empty token (`on##3000`) while missing trailing fields are dropped.

use std::fmt;

use crate::error::Result;
use crate::error::SyncError;

/// Power field value for "on"
pub const MSG_ON: &str = "on";

/// Power field value for "off"
pub const MSG_OFF: &str = "off";

/// Separator between message fields
pub const MSG_SEPARATOR: char = '#';

/// A single scalar message field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MsgField {
    Int(i64),
    Str(String),
}

impl MsgField {
    /// Parse an inbound token, preferring the integer reading.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        match token.parse::<i64>() {
            Ok(i) => MsgField::Int(i),
            Err(_) => MsgField::Str(token.to_string()),
        }
    }

    /// Integer value of the field at position `index`.
    pub fn as_int(&self, index: usize) -> Result<i64> {
        match self {
            MsgField::Int(i) => Ok(*i),
            MsgField::Str(s) => Err(SyncError::InvalidNumber {
                index,
                token: s.clone(),
            }),
        }
    }

    pub fn is_token(&self, token: &str) -> bool {
        matches!(self, MsgField::Str(s) if s == token)
    }
}

impl fmt::Display for MsgField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MsgField::Int(i) => write!(f, "{}", i),
            MsgField::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for MsgField {
    fn from(i: i64) -> Self {
        MsgField::Int(i)
    }
}

impl From<&str> for MsgField {
    fn from(s: &str) -> Self {
        MsgField::Str(s.to_string())
    }
}

/// An ordered list of message fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    fields: Vec<MsgField>,
}

impl Message {
    pub fn new(fields: Vec<MsgField>) -> Self {
        Self { fields }
    }

    /// Build a message from generator output, where `None` means "no value".
    pub fn from_generated(generated: Vec<Option<MsgField>>) -> Self {
        let len = generated
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |last| last + 1);

        let fields = generated
            .into_iter()
            .take(len)
            .map(|f| f.unwrap_or_else(|| MsgField::Str(String::new())))
            .collect();

        Self { fields }
    }

    /// Parse an inbound payload. Never fails; field validation is the resolver's job.
    pub fn parse(payload: &str) -> Self {
        Self {
            fields: payload.split(MSG_SEPARATOR).map(MsgField::parse).collect(),
        }
    }

    pub fn fields(&self) -> &[MsgField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Wire representation of the message
    pub fn to_payload(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", MSG_SEPARATOR)?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}
