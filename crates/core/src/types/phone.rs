//! Delivery phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Country-code prefix every delivery phone number must start with.
pub const PHONE_PREFIX: &str = "+375";

/// Length of a complete number: the prefix plus nine subscriber digits.
pub const PHONE_LENGTH: usize = 13;

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneNumberError {
    /// The input string is empty.
    #[error("phone number is required")]
    Empty,
    /// The input does not start with the country prefix.
    #[error("phone number must start with {PHONE_PREFIX}")]
    WrongPrefix,
    /// The input is shorter than a complete number.
    #[error("phone number must be in the format {PHONE_PREFIX}XXXXXXXXX")]
    TooShort,
}

/// A delivery phone number such as `+375291234567`.
///
/// ## Constraints
///
/// - Must start with [`PHONE_PREFIX`]
/// - Must be at least [`PHONE_LENGTH`] characters long
///
/// ## Examples
///
/// ```
/// use telshop_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("+375291234567").is_ok());
/// assert!(PhoneNumber::parse("+37529123").is_err()); // too short
/// assert!(PhoneNumber::parse("+48291234567").is_err()); // wrong prefix
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a `PhoneNumber` from a string.
    ///
    /// Leading and trailing whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, lacks the country prefix, or
    /// is shorter than [`PHONE_LENGTH`].
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneNumberError::Empty);
        }
        if !s.starts_with(PHONE_PREFIX) {
            return Err(PhoneNumberError::WrongPrefix);
        }
        if s.chars().count() < PHONE_LENGTH {
            return Err(PhoneNumberError::TooShort);
        }
        Ok(Self(s.to_owned()))
    }

    /// Apply the input mask used by the order form: keep only digits and `+`,
    /// and never more than [`PHONE_LENGTH`] characters.
    #[must_use]
    pub fn normalize_input(raw: &str) -> String {
        raw.chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .take(PHONE_LENGTH)
            .collect()
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_numbers() {
        assert!(PhoneNumber::parse("+375291234567").is_ok());
        assert!(PhoneNumber::parse("  +375441112233 ").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(PhoneNumber::parse("   "), Err(PhoneNumberError::Empty));
    }

    #[test]
    fn test_parse_wrong_prefix() {
        assert_eq!(
            PhoneNumber::parse("+48291234567890"),
            Err(PhoneNumberError::WrongPrefix)
        );
        assert_eq!(
            PhoneNumber::parse("375291234567"),
            Err(PhoneNumberError::WrongPrefix)
        );
    }

    #[test]
    fn test_parse_too_short() {
        assert_eq!(PhoneNumber::parse("+375"), Err(PhoneNumberError::TooShort));
        assert_eq!(
            PhoneNumber::parse("+37529123456"),
            Err(PhoneNumberError::TooShort)
        );
    }

    #[test]
    fn test_normalize_input() {
        assert_eq!(
            PhoneNumber::normalize_input("+375 (29) 123-45-67"),
            "+375291234567"
        );
        assert_eq!(
            PhoneNumber::normalize_input("+3752912345678999"),
            "+375291234567"
        );
        assert_eq!(PhoneNumber::normalize_input("abc"), "");
    }
}
