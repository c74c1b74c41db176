//! The checkout state machine.
//!
//! The flow the pages walk through, made explicit so the guards can be
//! tested without rendering anything:
//!
//! ```text
//! cart -> address -> payment -> summary -> confirmed
//! ```
//!
//! Forward transitions out of `payment` and `summary` are guarded on the
//! draft's contents; every state except `confirmed` allows navigating
//! backward without losing entered data (the data lives in the draft, not
//! in the page).

use serde::{Deserialize, Serialize};

use super::{OrderDraft, Payment};

/// A step in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    Cart,
    Address,
    Payment,
    Summary,
    Confirmed,
}

/// Why a forward transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// No payment method has been selected.
    #[error("select a payment method to continue")]
    PaymentMissing,

    /// Card details failed the format checks.
    #[error("check the card details and try again")]
    InvalidCard,

    /// The draft is missing items, an address, or a payment method.
    #[error("the order needs items, a delivery address, and a payment method")]
    NotSubmittable,

    /// The order is already confirmed.
    #[error("the order is already confirmed")]
    Terminal,
}

impl CheckoutState {
    /// Attempt the forward transition out of this state.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] when the guard for this transition
    /// rejects the draft.
    pub fn advance(self, draft: &OrderDraft) -> Result<Self, TransitionError> {
        match self {
            Self::Cart => Ok(Self::Address),
            Self::Address => Ok(Self::Payment),
            Self::Payment => match &draft.payment {
                None => Err(TransitionError::PaymentMissing),
                Some(Payment::Card(card)) if !card.validate().is_empty() => {
                    Err(TransitionError::InvalidCard)
                }
                Some(_) => Ok(Self::Summary),
            },
            Self::Summary => {
                if draft.is_submittable() {
                    Ok(Self::Confirmed)
                } else {
                    Err(TransitionError::NotSubmittable)
                }
            }
            Self::Confirmed => Err(TransitionError::Terminal),
        }
    }

    /// The state reached by navigating backward, if any.
    #[must_use]
    pub const fn back(self) -> Option<Self> {
        match self {
            Self::Cart | Self::Confirmed => None,
            Self::Address => Some(Self::Cart),
            Self::Payment => Some(Self::Address),
            Self::Summary => Some(Self::Payment),
        }
    }

    /// Whether this state ends the flow.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed)
    }
}
