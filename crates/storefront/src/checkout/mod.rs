//! Checkout flow: the order draft and its state machine.
//!
//! The draft is the in-progress order assembled across the checkout steps
//! (address -> payment -> summary). Each step contributes its slice through
//! a pure merge function; nothing here validates another step's
//! completeness - that gate lives in [`machine::CheckoutState`] at the
//! summary transition.

pub mod machine;
pub mod payment;

pub use machine::{CheckoutState, TransitionError};
pub use payment::{CardDetails, CardErrors, Payment};

use serde::{Deserialize, Serialize};

use mangaba_core::{Cep, Money};

use crate::cart::{self, CartLine};

/// A delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub cep: Cep,
}

/// The in-progress, not-yet-submitted order.
///
/// Created with the cart's lines at checkout entry, filled incrementally,
/// and discarded on successful submission. It is never written to durable
/// storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub items: Vec<CartLine>,
    pub address: Option<Address>,
    pub payment: Option<Payment>,
    pub shipping: Option<Money>,
}

impl OrderDraft {
    /// Seed a draft from the cart's current lines.
    #[must_use]
    pub fn from_cart(items: Vec<CartLine>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Replace the line items (re-entry from the cart page).
    #[must_use]
    pub fn with_items(mut self, items: Vec<CartLine>) -> Self {
        self.items = items;
        self
    }

    /// Merge in the address step's contribution.
    #[must_use]
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Merge in the payment step's contribution.
    #[must_use]
    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payment = Some(payment);
        self
    }

    /// Merge in a selected shipping quote.
    #[must_use]
    pub fn with_shipping(mut self, shipping: Money) -> Self {
        self.shipping = Some(shipping);
        self
    }

    /// Subtotal over the draft's lines. Recomputed on every call.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        cart::subtotal(&self.items)
    }

    /// Grand total: subtotal plus shipping. Only defined once a shipping
    /// quote has been selected.
    #[must_use]
    pub fn total(&self) -> Option<Money> {
        self.shipping.map(|shipping| self.subtotal() + shipping)
    }

    /// Whether the draft can be submitted: at least one item, an address,
    /// and a payment method.
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        !self.items.is_empty() && self.address.is_some() && self.payment.is_some()
    }
}
