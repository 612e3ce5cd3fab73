//! The flat attribute tree every message travels as.
//!
//! An [`Element`] is deliberately simple: a tag naming the message kind and
//! an ordered list of string key/value pairs. There is no nesting. Lists of
//! records are flattened with a declared count under [`ARRAY_SIZE_KEY`] and
//! per-index keys built by [`Element::indexed_key`]:
//!
//! ```text
//! <rearrangeColony colony="colony:5" xLength="2"
//!     x0unit="unit:9" x0loc="building:6" x0role="model.role.default" x0count="0"
//!     x1unit="unit:10" x1loc="tile:3" x1work="model.goods.food" ... />
//! ```
//!
//! The accessors never fail. A missing attribute reads as an empty string,
//! a number that does not parse reads as the caller's sentinel. Turning
//! those sentinels into a readable rejection is the validator's job, so a
//! malformed message can never take the receiver down.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key holding the number of records in a flattened list.
pub const ARRAY_SIZE_KEY: &str = "xLength";

/// A tagged, ordered set of string attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    tag: String,
    /// Kept in insertion order so encoding is deterministic.
    #[serde(default)]
    attributes: Vec<(String, String)>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets an attribute, replacing the value in place if the key exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Reads a string attribute, defaulting to empty when absent.
    pub fn string(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// Reads an optional attribute. Only an absent key is `None`; a present
    /// but empty value comes back as `Some("")` for the validator to reject.
    pub fn optional(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    /// Reads an integer attribute, substituting `sentinel` when the value is
    /// missing or does not parse.
    pub fn int_or(&self, key: &str, sentinel: i64) -> i64 {
        match self.get(key) {
            None => sentinel,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::debug!(
                    tag = %self.tag, key, value = raw,
                    "unparsable integer attribute, using sentinel"
                );
                sentinel
            }),
        }
    }

    /// Reads the declared list length.
    ///
    /// Missing, unparsable and negative counts all read as zero. The count
    /// is also capped at the number of attributes present, since every
    /// genuine record contributes at least one attribute; a hostile
    /// `xLength="999999999"` therefore cannot make the decoder spin.
    pub fn count(&self) -> usize {
        let declared = self.int_or(ARRAY_SIZE_KEY, 0);
        let declared = usize::try_from(declared).unwrap_or(0);
        if declared > self.attributes.len() {
            tracing::debug!(
                tag = %self.tag, declared,
                attributes = self.attributes.len(),
                "declared list length exceeds attribute count, clamping"
            );
            return self.attributes.len();
        }
        declared
    }

    /// Key of `field` in the `index`-th record of a flattened list.
    pub fn indexed_key(index: usize, field: &str) -> String {
        format!("x{index}{field}")
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// XML-like rendering for logs: `<askSkill unit="unit:3" direction="E"/>`.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (k, v) in &self.attributes {
            write!(f, " {k}=\"{v}\"")?;
        }
        write!(f, "/>")
    }
}
