//! Brazilian postal code (CEP) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Cep`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CepError {
    /// The input string is empty.
    #[error("CEP cannot be empty")]
    Empty,
    /// The input does not contain exactly eight digits.
    #[error("CEP must contain exactly {expected} digits (got {got})")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
        /// Number of digits found.
        got: usize,
    },
}

/// A Brazilian postal code.
///
/// Stored as exactly eight ASCII digits. Parsing strips any formatting
/// characters (`01310-100` and `01310100` are the same code), matching how
/// the postal lookup service expects the code on the wire.
///
/// ## Examples
///
/// ```
/// use mangaba_core::Cep;
///
/// let cep = Cep::parse("01310-100").unwrap();
/// assert_eq!(cep.as_str(), "01310100");
/// assert_eq!(cep.formatted(), "01310-100");
///
/// assert!(Cep::parse("").is_err());
/// assert!(Cep::parse("1234").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cep(String);

impl Cep {
    /// Number of digits in a CEP.
    pub const DIGITS: usize = 8;

    /// Parse a `Cep` from a string, ignoring non-digit characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or does not contain exactly
    /// eight digits once formatting is stripped.
    pub fn parse(s: &str) -> Result<Self, CepError> {
        if s.trim().is_empty() {
            return Err(CepError::Empty);
        }

        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        if digits.len() != Self::DIGITS {
            return Err(CepError::WrongLength {
                expected: Self::DIGITS,
                got: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// Returns the bare eight-digit code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the code in display form (`01310-100`).
    #[must_use]
    pub fn formatted(&self) -> String {
        let (prefix, suffix) = self.0.split_at(5);
        format!("{prefix}-{suffix}")
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl std::str::FromStr for Cep {
    type Err = CepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Cep {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_digits() {
        let cep = Cep::parse("01310100").unwrap();
        assert_eq!(cep.as_str(), "01310100");
    }

    #[test]
    fn test_parse_strips_formatting() {
        let cep = Cep::parse("01310-100").unwrap();
        assert_eq!(cep.as_str(), "01310100");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Cep::parse("  "), Err(CepError::Empty));
    }

    #[test]
    fn test_parse_too_short() {
        assert_eq!(
            Cep::parse("1234"),
            Err(CepError::WrongLength {
                expected: 8,
                got: 4
            })
        );
    }

    #[test]
    fn test_parse_too_many_digits() {
        assert!(Cep::parse("013101000").is_err());
    }

    #[test]
    fn test_display_formats_with_dash() {
        let cep = Cep::parse("01310100").unwrap();
        assert_eq!(cep.to_string(), "01310-100");
    }

    #[test]
    fn test_from_str() {
        let cep: Cep = "04538-133".parse().unwrap();
        assert_eq!(cep.as_str(), "04538133");
    }
}
