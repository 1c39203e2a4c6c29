//! Reply decoding for tuned control calls.
//!
//! Tuned answers in one of two shapes: a direct value (`as`, `b`, `s`) or a
//! `(bs)` pair whose flag reports success and whose string carries the failure
//! detail. Replies are first lowered to [`ReplyValue`]s, then decoded per the
//! method's [`ResponseConvention`] into a [`DaemonResponse`].

use zbus::zvariant::{Structure, Value};
use zbus::Message;

use crate::error::TunedError;

/// A single reply field, detached from the message buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyValue {
    Bool(bool),
    Str(String),
    StrList(Vec<String>),
    Fields(Vec<ReplyValue>),
    /// Anything else; holds the D-Bus signature for diagnostics.
    Other(String),
}

impl ReplyValue {
    pub fn kind(&self) -> String {
        match self {
            ReplyValue::Bool(_) => "b".to_string(),
            ReplyValue::Str(_) => "s".to_string(),
            ReplyValue::StrList(_) => "as".to_string(),
            ReplyValue::Fields(fields) => {
                let inner: String = fields.iter().map(|f| f.kind()).collect();
                format!("({})", inner)
            }
            ReplyValue::Other(signature) => signature.clone(),
        }
    }
}

impl From<&Value<'_>> for ReplyValue {
    fn from(value: &Value<'_>) -> Self {
        match value {
            Value::Bool(b) => ReplyValue::Bool(*b),
            Value::Str(s) => ReplyValue::Str(s.as_str().to_owned()),
            Value::Array(array) => {
                let items: Option<Vec<String>> = array
                    .iter()
                    .map(|item| match item {
                        Value::Str(s) => Some(s.as_str().to_owned()),
                        _ => None,
                    })
                    .collect();
                items
                    .map(ReplyValue::StrList)
                    .unwrap_or_else(|| ReplyValue::Other(value.value_signature().to_string()))
            }
            Value::Structure(structure) => {
                ReplyValue::Fields(structure.fields().iter().map(ReplyValue::from).collect())
            }
            Value::Value(inner) => ReplyValue::from(inner.as_ref()),
            other => ReplyValue::Other(other.value_signature().to_string()),
        }
    }
}

/// Top-level fields of a method reply.
///
/// A reply whose only argument is a structure is flattened to the
/// structure's fields, so `(bs)` and `bs` bodies read the same.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    fields: Vec<ReplyValue>,
}

impl Reply {
    pub fn new(fields: Vec<ReplyValue>) -> Self {
        match <[ReplyValue; 1]>::try_from(fields) {
            Ok([ReplyValue::Fields(inner)]) => Self { fields: inner },
            Ok([single]) => Self {
                fields: vec![single],
            },
            Err(fields) => Self { fields },
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Lower a method return message into reply fields.
    pub fn from_message(method: &str, message: &Message) -> Result<Self, TunedError> {
        let body = message.body();
        if body.signature().to_string().is_empty() {
            return Ok(Self::empty());
        }

        let structure: Structure<'_> = body
            .deserialize()
            .map_err(|e| TunedError::decode(method, format!("unreadable body: {}", e)))?;
        Ok(Self::new(
            structure.fields().iter().map(ReplyValue::from).collect(),
        ))
    }

    pub fn fields(&self) -> &[ReplyValue] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// How a control method encodes its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseConvention {
    /// Reply is ignored.
    NoPayload,
    /// First field is the result.
    DirectValue,
    /// `(success, detail)`; detail only meaningful on failure.
    FlagDetail,
}

/// Decoded daemon reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonResponse {
    Empty,
    Value(ReplyValue),
    Outcome {
        success: bool,
        detail: Option<String>,
    },
}

impl DaemonResponse {
    pub fn decode(
        method: &str,
        convention: ResponseConvention,
        reply: Reply,
    ) -> Result<Self, TunedError> {
        match convention {
            ResponseConvention::NoPayload => Ok(DaemonResponse::Empty),
            ResponseConvention::DirectValue => reply
                .fields
                .into_iter()
                .next()
                .map(DaemonResponse::Value)
                .ok_or_else(|| TunedError::decode(method, "empty reply")),
            ResponseConvention::FlagDetail => decode_flag_detail(method, reply),
        }
    }

    /// Unwrap a flag+detail outcome, surfacing the daemon's detail on failure.
    pub fn into_outcome(self, method: &str) -> Result<(), TunedError> {
        match self {
            DaemonResponse::Outcome { success: true, .. } => Ok(()),
            DaemonResponse::Outcome {
                success: false,
                detail,
            } => Err(TunedError::DaemonReportedFailure(
                detail.unwrap_or_default(),
            )),
            other => Err(TunedError::decode(
                method,
                format!("expected success flag and detail, got {:?}", other),
            )),
        }
    }

    pub fn into_bool(self, method: &str) -> Result<bool, TunedError> {
        match self {
            DaemonResponse::Value(ReplyValue::Bool(b)) => Ok(b),
            other => Err(mismatch(method, "b", &other)),
        }
    }

    pub fn into_string(self, method: &str) -> Result<String, TunedError> {
        match self {
            DaemonResponse::Value(ReplyValue::Str(s)) => Ok(s),
            other => Err(mismatch(method, "s", &other)),
        }
    }

    pub fn into_string_list(self, method: &str) -> Result<Vec<String>, TunedError> {
        match self {
            DaemonResponse::Value(ReplyValue::StrList(list)) => Ok(list),
            other => Err(mismatch(method, "as", &other)),
        }
    }
}

fn mismatch(method: &str, expected: &str, got: &DaemonResponse) -> TunedError {
    let got = match got {
        DaemonResponse::Empty => "nothing".to_string(),
        DaemonResponse::Value(value) => value.kind(),
        DaemonResponse::Outcome { .. } => "(bs)".to_string(),
    };
    TunedError::decode(method, format!("expected {}, got {}", expected, got))
}

fn decode_flag_detail(method: &str, reply: Reply) -> Result<DaemonResponse, TunedError> {
    let mut fields = reply.fields.into_iter();

    let success = match fields.next() {
        Some(ReplyValue::Bool(b)) => b,
        Some(other) => {
            return Err(TunedError::decode(
                method,
                format!("success flag must be b, got {}", other.kind()),
            ))
        }
        None => return Err(TunedError::decode(method, "empty reply")),
    };

    let detail = match fields.next() {
        Some(ReplyValue::Str(s)) => Some(s),
        Some(other) if !success => {
            return Err(TunedError::decode(
                method,
                format!("failure detail must be s, got {}", other.kind()),
            ))
        }
        None if !success => {
            return Err(TunedError::decode(method, "failure reply without detail"));
        }
        _ => None,
    };

    Ok(DaemonResponse::Outcome { success, detail })
}
