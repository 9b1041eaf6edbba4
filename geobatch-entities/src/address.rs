use std::{borrow::Borrow, fmt, ops::Deref};

/// A free-text description of a location, e.g. a postal address.
///
/// The text is trimmed and never empty. Two queries are equal
/// if and only if their trimmed texts are equal (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddressQuery(String);

impl AddressQuery {
    /// Returns `None` for missing, empty or whitespace-only input.
    pub fn parse(text: Option<&str>) -> Option<Self> {
        let trimmed = text?.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for AddressQuery {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for AddressQuery {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for AddressQuery {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AddressQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
