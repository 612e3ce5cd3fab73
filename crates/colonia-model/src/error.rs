//! Error types for identifier resolution.

use crate::ObjectKind;

/// Why an identifier could not be turned into a live object.
///
/// The resolver only proves *existence* and *kind*. Ownership is a separate
/// check layered on top by [`Game::resolve_ours`](crate::Game::resolve_ours),
/// which is the only place [`ResolveError::NotOwned`] comes from.
///
/// The `Display` text is shown to players inside client errors, so it names
/// the offending identifier but never leaks anything beyond it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The identifier was empty or missing from the message.
    #[error("empty identifier")]
    Empty,

    /// No object with this identifier exists in the game.
    #[error("no object with id {0}")]
    NotFound(String),

    /// The object exists but is of a different kind than the field expects.
    #[error("{id} is a {found}, not a {expected}")]
    WrongKind {
        id: String,
        expected: &'static str,
        found: ObjectKind,
    },

    /// The object exists but belongs to another player.
    #[error("{id} does not belong to {player}")]
    NotOwned { id: String, player: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_identifier() {
        let err = ResolveError::NotFound("unit:99".into());
        assert_eq!(err.to_string(), "no object with id unit:99");
    }

    #[test]
    fn test_wrong_kind_names_both_kinds() {
        let err = ResolveError::WrongKind {
            id: "colony:4".into(),
            expected: "unit",
            found: ObjectKind::Colony,
        };
        assert_eq!(err.to_string(), "colony:4 is a colony, not a unit");
    }
}
