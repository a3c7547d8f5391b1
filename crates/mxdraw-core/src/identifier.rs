//! Identifier management using string interning
//!
//! draw.io cell ids are arbitrary strings (`"0"`, `"1"`,
//! `"WIyWlLk6GJQsqaUBKTNV-3"`). They are interned once so that references
//! between cells compare and hash as a single integer.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for cell identifiers.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> std::sync::MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Interned cell identifier.
///
/// # Examples
///
/// ```
/// use mxdraw_core::identifier::Id;
///
/// let id = Id::new("box-1");
/// assert_eq!(id, Id::new("box-1"));
/// assert_eq!(id, "box-1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates an identifier for an entity synthesized by mxdraw itself,
    /// such as the label carried by a connector's own value.
    ///
    /// # Examples
    ///
    /// ```
    /// use mxdraw_core::identifier::Id;
    ///
    /// let edge = Id::new("e1");
    /// assert_eq!(edge.with_suffix("label"), "e1-label");
    /// ```
    pub fn with_suffix(&self, suffix: &str) -> Self {
        let name = format!("{self}-{suffix}");
        Self::new(&name)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        // Every `Id` is created through the interner, so the symbol resolves.
        let value = interner.resolve(self.0).unwrap_or_default();
        write!(f, "{value}")
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
