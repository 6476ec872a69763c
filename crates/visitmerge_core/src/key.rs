//! Visit-key helpers.
//!
//! A visit-key is a node-type name, optionally followed by the exit suffix:
//! `"Identifier"` runs when traversal enters an `Identifier` node and
//! `"Identifier:exit"` runs when it leaves one. Only the suffix is
//! interpreted; the node-type part is opaque.

/// Suffix marking a key as an exit key.
pub const EXIT_SUFFIX: &str = ":exit";

/// Returns true if `key` carries the default exit suffix.
///
/// ```rust
/// use visitmerge_core::key::is_exit_key;
///
/// assert!(is_exit_key("Literal:exit"));
/// assert!(!is_exit_key("Literal"));
/// ```
#[inline]
pub fn is_exit_key(key: &str) -> bool {
    key.ends_with(EXIT_SUFFIX)
}

/// Builds the exit key for a node type.
///
/// ```rust
/// use visitmerge_core::key::exit_key;
///
/// assert_eq!(exit_key("Paragraph"), "Paragraph:exit");
/// ```
pub fn exit_key(node_type: &str) -> String {
    let mut key = String::with_capacity(node_type.len() + EXIT_SUFFIX.len());
    key.push_str(node_type);
    key.push_str(EXIT_SUFFIX);
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::entry("Identifier", false)]
    #[case::exit("Identifier:exit", true)]
    #[case::suffix_only(":exit", true)]
    #[case::suffix_in_middle("Identifier:exit:more", false)]
    #[case::no_colon("Identifierexit", false)]
    #[case::empty("", false)]
    fn test_is_exit_key(#[case] key: &str, #[case] expected: bool) {
        assert_eq!(is_exit_key(key), expected);
    }

    #[test]
    fn test_exit_key_round_trips_through_predicate() {
        let key = exit_key("ExpressionStatement");
        assert_eq!(key, "ExpressionStatement:exit");
        assert!(is_exit_key(&key));
    }
}
