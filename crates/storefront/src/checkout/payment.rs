//! Payment methods, card format checks, and input masks.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Expiry format: `MM/YY` with month 01-12; the slash is optional on input.
static EXPIRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal, checked by tests
    Regex::new(r"^(0[1-9]|1[0-2])/?([0-9]{2})$").unwrap()
});

/// Number of digits in an accepted card number.
const CARD_NUMBER_DIGITS: usize = 16;

/// A selected payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payment {
    /// Credit card with full details.
    Card(CardDetails),
    /// Bank slip; no further details needed.
    Boleto,
}

impl Payment {
    /// Human-readable method name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Card(_) => "Credit card",
            Self::Boleto => "Boleto",
        }
    }

    /// Last four digits of the card number, for the summary page.
    #[must_use]
    pub fn card_suffix(&self) -> Option<String> {
        match self {
            Self::Card(card) => {
                let d = digits(&card.number);
                Some(d.chars().skip(d.len().saturating_sub(4)).collect())
            }
            Self::Boleto => None,
        }
    }
}

/// Credit card details as entered on the payment step.
///
/// Values are kept in their masked display form; validation strips the
/// formatting before checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub number: String,
    pub holder: String,
    pub expiry: String,
    pub cvv: String,
}

/// Per-field validation errors for a card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardErrors {
    pub number: Option<&'static str>,
    pub holder: Option<&'static str>,
    pub expiry: Option<&'static str>,
    pub cvv: Option<&'static str>,
}

impl CardErrors {
    /// Whether every field passed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.number.is_none()
            && self.holder.is_none()
            && self.expiry.is_none()
            && self.cvv.is_none()
    }
}

impl CardDetails {
    /// Check all four fields, returning an error message per failing field.
    #[must_use]
    pub fn validate(&self) -> CardErrors {
        let mut errors = CardErrors::default();

        if digits(&self.number).len() != CARD_NUMBER_DIGITS {
            errors.number = Some("Card number must have 16 digits");
        }
        if self.holder.trim().is_empty() {
            errors.holder = Some("Name on card is required");
        }
        if !EXPIRY_RE.is_match(self.expiry.trim()) {
            errors.expiry = Some("Expiry must be MM/YY");
        }
        let cvv_len = digits(&self.cvv).len();
        if !(3..=4).contains(&cvv_len) || digits(&self.cvv) != self.cvv.trim() {
            errors.cvv = Some("CVV must have 3 or 4 digits");
        }

        errors
    }
}

/// Strip everything but ASCII digits.
fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

// =============================================================================
// Input masks
// =============================================================================

/// Format a card number as `0000 0000 0000 0000` (capped at 16 digits).
#[must_use]
pub fn mask_card_number(value: &str) -> String {
    let d: String = digits(value).chars().take(CARD_NUMBER_DIGITS).collect();
    let mut out = String::with_capacity(d.len() + 3);
    for (i, c) in d.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Format an expiry as `MM/YY` (capped at 4 digits).
#[must_use]
pub fn mask_expiry(value: &str) -> String {
    let d: String = digits(value).chars().take(4).collect();
    if d.len() <= 2 {
        return d;
    }
    let (month, year) = d.split_at(2);
    format!("{month}/{year}")
}

/// Keep only digits in a CVV (capped at 4).
#[must_use]
pub fn mask_cvv(value: &str) -> String {
    digits(value).chars().take(4).collect()
}
