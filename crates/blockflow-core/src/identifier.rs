//! Identifier management using string interning.
//!
//! Node ids are compared on every edge lookup, so they are interned once and
//! afterwards handled as a `Copy` symbol.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock, PoisonError},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Interned identifier of a diagram node.
///
/// # Examples
///
/// ```
/// use blockflow_core::identifier::Id;
///
/// let encoder = Id::new("encoder-stack");
/// assert_eq!(encoder, "encoder-stack");
/// assert_eq!(encoder, Id::new("encoder-stack"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string, interning it on first use.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns an identifier usable as an SVG `id` attribute.
    ///
    /// Characters outside `[A-Za-z0-9_-]` are replaced by `_` and the result
    /// is prefixed so that it never starts with a digit.
    ///
    /// ```
    /// use blockflow_core::identifier::Id;
    ///
    /// assert_eq!(Id::new("lm head").to_dom_id("node"), "node-lm_head");
    /// ```
    pub fn to_dom_id(self, prefix: &str) -> String {
        let sanitized: String = self
            .to_string()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{prefix}-{sanitized}")
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        f.write_str(value)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
