//! Transfer options and the `Transport` seam.
//!
//! # Design
//! A transport is the engine that actually moves bytes. `TransferClient`
//! never talks to the network itself: it builds one `TransferOptions` map
//! per request, asks the transport to `apply` it, then hands over a
//! `Transfer` for `execute`. Everything that is plain data lives in the
//! option map so it can be logged, compared in tests and loaded from JSON.
//! The two pieces that cannot be data (the upload stream and the header
//! callback) travel alongside it in `Transfer`.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{OptionRejected, TransportFailure};

/// Keys understood by transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKey {
    /// Request method sent on the wire.
    CustomRequest,
    /// Read the request body from the upload stream.
    Upload,
    /// Expected size of the upload stream, in bytes.
    InFileSize,
    /// In-memory request body.
    PostFields,
    /// Outgoing `Name: value` header lines.
    HttpHeader,
    /// Outgoing `Cookie` header value.
    Cookie,
    /// Return the response body to the caller instead of discarding it.
    ReturnTransfer,
    /// Include response headers in the returned body.
    Header,
    FollowLocation,
    MaxRedirects,
    TimeoutMs,
    ConnectTimeoutMs,
    UserAgent,
}

impl OptionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::CustomRequest => "custom_request",
            OptionKey::Upload => "upload",
            OptionKey::InFileSize => "in_file_size",
            OptionKey::PostFields => "post_fields",
            OptionKey::HttpHeader => "http_header",
            OptionKey::Cookie => "cookie",
            OptionKey::ReturnTransfer => "return_transfer",
            OptionKey::Header => "header",
            OptionKey::FollowLocation => "follow_location",
            OptionKey::MaxRedirects => "max_redirects",
            OptionKey::TimeoutMs => "timeout_ms",
            OptionKey::ConnectTimeoutMs => "connect_timeout_ms",
            OptionKey::UserAgent => "user_agent",
        }
    }

    /// The only value kind this key accepts.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            OptionKey::CustomRequest | OptionKey::Cookie | OptionKey::UserAgent => ValueKind::Text,
            OptionKey::Upload
            | OptionKey::ReturnTransfer
            | OptionKey::Header
            | OptionKey::FollowLocation => ValueKind::Bool,
            OptionKey::InFileSize
            | OptionKey::MaxRedirects
            | OptionKey::TimeoutMs
            | OptionKey::ConnectTimeoutMs => ValueKind::Int,
            OptionKey::PostFields => ValueKind::Bytes,
            OptionKey::HttpHeader => ValueKind::Lines,
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Text,
    Lines,
    Bytes,
}

/// A single option value.
///
/// Untagged so JSON config reads naturally: `true`, `30000`, `"agent/1"`,
/// `["X-A: 1"]`. Inside a `TransferOptions` the key picks the kind first, so
/// `"post_fields": []` is an empty `Bytes` body rather than empty `Lines`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(u64),
    Text(String),
    Lines(Vec<String>),
    Bytes(Vec<u8>),
}

impl OptionValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            OptionValue::Bool(_) => ValueKind::Bool,
            OptionValue::Int(_) => ValueKind::Int,
            OptionValue::Text(_) => ValueKind::Text,
            OptionValue::Lines(_) => ValueKind::Lines,
            OptionValue::Bytes(_) => ValueKind::Bytes,
        }
    }

    /// Read `raw` as `kind`, falling back to whatever shape it has so that
    /// `validate` can report the mismatch against the key.
    fn from_json_as(kind: ValueKind, raw: serde_json::Value) -> serde_json::Result<Self> {
        let typed = match kind {
            ValueKind::Bool => bool::deserialize(&raw).map(OptionValue::Bool),
            ValueKind::Int => u64::deserialize(&raw).map(OptionValue::Int),
            ValueKind::Text => String::deserialize(&raw).map(OptionValue::Text),
            ValueKind::Lines => Vec::<String>::deserialize(&raw).map(OptionValue::Lines),
            ValueKind::Bytes => Vec::<u8>::deserialize(&raw).map(OptionValue::Bytes),
        };
        typed.or_else(|_| OptionValue::deserialize(raw))
    }
}

/// The option set for one transfer. Keys are unique; setting a key twice
/// keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TransferOptions {
    values: BTreeMap<OptionKey, OptionValue>,
}

impl<'de> Deserialize<'de> for TransferOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<OptionKey, serde_json::Value>::deserialize(deserializer)?;
        let mut values = BTreeMap::new();
        for (key, value) in raw {
            let value = OptionValue::from_json_as(key.value_kind(), value)
                .map_err(|err| D::Error::custom(format!("{key}: {err}")))?;
            values.insert(key, value);
        }
        Ok(Self { values })
    }
}

impl TransferOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: OptionKey, value: OptionValue) {
        self.values.insert(key, value);
    }

    pub fn get(&self, key: OptionKey) -> Option<&OptionValue> {
        self.values.get(&key)
    }

    pub fn contains(&self, key: OptionKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionKey, &OptionValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn bool(&self, key: OptionKey) -> Option<bool> {
        match self.values.get(&key) {
            Some(OptionValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn int(&self, key: OptionKey) -> Option<u64> {
        match self.values.get(&key) {
            Some(OptionValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn text(&self, key: OptionKey) -> Option<&str> {
        match self.values.get(&key) {
            Some(OptionValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn lines(&self, key: OptionKey) -> Option<&[String]> {
        match self.values.get(&key) {
            Some(OptionValue::Lines(lines)) => Some(lines),
            _ => None,
        }
    }

    pub fn bytes(&self, key: OptionKey) -> Option<&[u8]> {
        match self.values.get(&key) {
            Some(OptionValue::Bytes(b)) => Some(b),
            _ => None,
        }
    }

    /// Copy every entry of `fallback` whose key is not already set.
    /// Existing entries are never overwritten.
    pub fn fill_from(&mut self, fallback: &TransferOptions) {
        for (key, value) in &fallback.values {
            self.values.entry(*key).or_insert_with(|| value.clone());
        }
    }

    /// Check every value against the kind its key expects.
    pub fn validate(&self) -> Result<(), OptionRejected> {
        for (key, value) in &self.values {
            let expected = key.value_kind();
            if value.kind() != expected {
                return Err(OptionRejected {
                    key: *key,
                    reason: format!("expected {expected:?} value, got {:?}", value.kind()),
                });
            }
            if let OptionValue::Lines(lines) = value {
                if let Some(bad) = lines.iter().find(|l| !l.contains(':')) {
                    return Err(OptionRejected {
                        key: *key,
                        reason: format!("header line `{bad}` has no `:` separator"),
                    });
                }
            }
        }
        Ok(())
    }
}

/// One transfer handed to a transport.
pub struct Transfer<'a> {
    pub url: &'a str,
    pub options: &'a TransferOptions,
    /// Body source when `upload` is set.
    pub upload: Option<&'a mut dyn Read>,
    /// Called once per received header line, status line and the blank
    /// terminator included.
    pub on_header: &'a mut dyn FnMut(&str) -> usize,
}

/// The result of a transfer that reached the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    pub status: u16,
    pub body: Vec<u8>,
}

/// A transfer engine.
///
/// `apply` must not touch the network. `execute` performs exactly one
/// round trip and must not retry.
pub trait Transport {
    /// Accept or reject an option set for `url`.
    fn apply(&self, url: &str, options: &TransferOptions) -> Result<(), OptionRejected> {
        let _ = url;
        options.validate()
    }

    fn execute(&self, transfer: Transfer<'_>) -> Result<Completed, TransportFailure>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn apply(&self, url: &str, options: &TransferOptions) -> Result<(), OptionRejected> {
        (**self).apply(url, options)
    }

    fn execute(&self, transfer: Transfer<'_>) -> Result<Completed, TransportFailure> {
        (**self).execute(transfer)
    }
}
