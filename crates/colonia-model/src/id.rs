//! Typed identifiers for game objects and rule entries.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An opaque identifier naming one object of kind `T`.
///
/// On the wire an identifier is just a string such as `"unit:12"`. Inside
/// the server we keep the string but tag it with the kind it was resolved
/// as. This is the same newtype idea as a `PlayerId(u64)`, generalised over
/// every object kind with a phantom type parameter:
///
/// - `Id<Unit>` and `Id<Colony>` are different types, so the compiler
///   rejects passing one where the other is expected.
/// - `PhantomData<fn() -> T>` keeps `Id<T>` `Send + Sync`
///   regardless of `T`, because we never actually store a `T`.
///
/// The trait impls are written by hand instead of derived: `#[derive]` would
/// add a `T: Clone` / `T: PartialEq` bound, and game objects such as `Unit`
/// do not need to be comparable for their *ids* to be comparable.
pub struct Id<T> {
    raw: String,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Wraps a raw identifier string.
    ///
    /// This does not check that the object exists. Only
    /// [`Game`](crate::Game) hands out ids that are known to be live.
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            _kind: PhantomData,
        }
    }

    /// Returns the identifier as it appears on the wire.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Consumes the id and returns the raw string.
    pub fn into_inner(self) -> String {
        self.raw
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.raw.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.raw)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl<T> From<&str> for Id<T> {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

// Serialized as the bare string, the same as `#[serde(transparent)]` would
// produce for a plain newtype.
impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Thing;

    #[test]
    fn test_id_display_is_raw_string() {
        let id: Id<Thing> = Id::new("unit:7");
        assert_eq!(id.to_string(), "unit:7");
        assert_eq!(id.as_str(), "unit:7");
    }

    #[test]
    fn test_id_equality_ignores_nothing_but_raw() {
        let a: Id<Thing> = Id::new("a");
        assert_eq!(a, Id::new("a"));
        assert_ne!(a, Id::new("b"));
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&Id::<Thing>::new("colony:3")).unwrap();
        assert_eq!(json, "\"colony:3\"");

        let back: Id<Thing> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "colony:3");
    }

    #[test]
    fn test_id_works_as_map_key() {
        let mut map = HashMap::new();
        map.insert(Id::<Thing>::new("x"), 1);
        assert_eq!(map[&Id::new("x")], 1);
    }
}
