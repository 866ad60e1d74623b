//! Identifier management using string interning
//!
//! This module provides the [`Id`] type used for component, container and
//! connection-endpoint identifiers. Ids are compared constantly during
//! validation and rendering, so they are interned once and copied afterwards.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut interner)
}

/// Interned string identifier.
///
/// # Examples
///
/// ```
/// use stratus_core::identifier::Id;
///
/// let db = Id::new("orders-db");
/// assert_eq!(db, "orders-db");
/// assert_eq!(db, Id::new("orders-db"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string slice.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Returns the interned string as an owned `String`.
    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = with_interner(|interner| interner.resolve(self.0).map(str::to_owned));
        match value {
            Some(value) => f.write_str(&value),
            None => Err(fmt::Error),
        }
    }
}

impl std::str::FromStr for Id {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for Id {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("vpc");
        let id2 = Id::new("vpc");
        let id3 = Id::new("alb");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "vpc");
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("display_test");
        assert_eq!(format!("{id}"), "display_test");
        assert_eq!(id.as_string(), "display_test");
    }

    #[test]
    fn test_from_trait() {
        let id1: Id = "test_string".into();
        let owned = String::from("test_string");
        let id2: Id = (&owned).into();

        assert_eq!(id1, id2);
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Id::new("key1"), "value1");
        map.insert(Id::new("key2"), "value2");

        assert_eq!(map.get(&Id::new("key1")), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str() {
        let id = Id::new("svc");

        assert!(id == "svc");
        assert!(id != "sv");

        let empty = Id::new("");
        assert!(empty == "");
    }
}
