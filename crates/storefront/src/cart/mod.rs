//! Shopping cart lines and operations.
//!
//! The cart is a flat list of lines serialized as JSON text under a single
//! session key. Mutations are pure functions over the line list; the
//! [`CartService`] wraps them with load/persist against a [`CartStore`],
//! so production uses the session and unit tests supply an in-memory fake.

mod store;

pub use store::{CartStore, SessionCartStore, StoreError};

use serde::{Deserialize, Serialize};

use mangaba_core::{Money, ProductId};

use crate::backend::types::Product;

/// One product entry in the shopping cart.
///
/// A line's quantity is always at least 1: a decrement that would reach
/// zero removes the line instead of storing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartLine {
    /// Line total: unit price x quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

impl From<&Product> for CartLine {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
            image_url: product.image_url.clone(),
        }
    }
}

// =============================================================================
// Pure line operations
// =============================================================================

/// Add a product: increment its line if present, otherwise append with
/// quantity 1.
pub fn add_line(lines: &mut Vec<CartLine>, product: &Product) {
    match lines.iter_mut().find(|l| l.product_id == product.id) {
        Some(line) => line.quantity += 1,
        None => lines.push(CartLine::from(product)),
    }
}

/// Remove a line by product ID. Removing an absent ID is a no-op.
pub fn remove_line(lines: &mut Vec<CartLine>, id: ProductId) {
    lines.retain(|l| l.product_id != id);
}

/// Increase a line's quantity by one. An absent ID is a no-op.
pub fn increment_line(lines: &mut [CartLine], id: ProductId) {
    if let Some(line) = lines.iter_mut().find(|l| l.product_id == id) {
        line.quantity += 1;
    }
}

/// Decrease a line's quantity by one, removing the line when it would
/// reach zero.
pub fn decrement_line(lines: &mut Vec<CartLine>, id: ProductId) {
    let Some(line) = lines.iter_mut().find(|l| l.product_id == id) else {
        return;
    };

    if line.quantity <= 1 {
        remove_line(lines, id);
    } else {
        line.quantity -= 1;
    }
}

/// Sum of line totals. Recomputed on every call, never cached.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> Money {
    lines.iter().map(CartLine::line_total).sum()
}

/// Total number of units across all lines.
#[must_use]
pub fn item_count(lines: &[CartLine]) -> u32 {
    lines.iter().map(|l| l.quantity).sum()
}

// =============================================================================
// CartService
// =============================================================================

/// Cart operations bound to a store.
///
/// Every mutation loads the current list, applies the pure operation, and
/// persists the result. Store write failures propagate unchanged; malformed
/// stored text reads as an empty cart.
pub struct CartService<S> {
    store: S,
}

impl<S: CartStore> CartService<S> {
    /// Create a service over the given store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Current cart lines. Absent or unparsable stored text yields an
    /// empty list.
    pub async fn items(&self) -> Result<Vec<CartLine>, StoreError> {
        let lines = match self.store.read().await? {
            Some(text) => serde_json::from_str(&text).unwrap_or_default(),
            None => Vec::new(),
        };
        Ok(lines)
    }

    async fn persist(&self, lines: &[CartLine]) -> Result<(), StoreError> {
        let text = serde_json::to_string(lines)?;
        self.store.write(&text).await
    }

    /// Add a product to the cart and return the updated lines.
    pub async fn add_item(&self, product: &Product) -> Result<Vec<CartLine>, StoreError> {
        let mut lines = self.items().await?;
        add_line(&mut lines, product);
        self.persist(&lines).await?;
        Ok(lines)
    }

    /// Remove a product from the cart and return the updated lines.
    pub async fn remove_item(&self, id: ProductId) -> Result<Vec<CartLine>, StoreError> {
        let mut lines = self.items().await?;
        remove_line(&mut lines, id);
        self.persist(&lines).await?;
        Ok(lines)
    }

    /// Increase a line's quantity and return the updated lines.
    pub async fn increment(&self, id: ProductId) -> Result<Vec<CartLine>, StoreError> {
        let mut lines = self.items().await?;
        increment_line(&mut lines, id);
        self.persist(&lines).await?;
        Ok(lines)
    }

    /// Decrease a line's quantity (removing at zero) and return the
    /// updated lines.
    pub async fn decrement(&self, id: ProductId) -> Result<Vec<CartLine>, StoreError> {
        let mut lines = self.items().await?;
        decrement_line(&mut lines, id);
        self.persist(&lines).await?;
        Ok(lines)
    }

    /// Subtotal over the current lines. Zero for an empty cart.
    pub async fn subtotal(&self) -> Result<Money, StoreError> {
        Ok(subtotal(&self.items().await?))
    }

    /// Total unit count over the current lines.
    pub async fn item_count(&self) -> Result<u32, StoreError> {
        Ok(item_count(&self.items().await?))
    }

    /// Persist an empty cart.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.persist(&[]).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::store::MemoryCartStore;
    use super::*;

    fn product(id: i64, price_cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: None,
            price: Money::from_cents(price_cents),
            stock: 10,
            rating: None,
            active: true,
            image_url: None,
        }
    }

    fn service() -> CartService<MemoryCartStore> {
        CartService::new(MemoryCartStore::default())
    }

    #[tokio::test]
    async fn test_add_new_item_starts_at_quantity_one() {
        let cart = service();
        let lines = cart.add_item(&product(1, 1000)).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn test_add_same_item_twice_doubles_subtotal() {
        let cart = service();
        let p = product(1, 1000);
        cart.add_item(&p).await.unwrap();
        cart.add_item(&p).await.unwrap();
        assert_eq!(cart.subtotal().await.unwrap(), Money::from_cents(2000));
        assert_eq!(cart.items().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_increment_and_decrement() {
        let cart = service();
        cart.add_item(&product(1, 1000)).await.unwrap();

        let lines = cart.increment(ProductId::new(1)).await.unwrap();
        assert_eq!(lines.first().unwrap().quantity, 2);
        assert_eq!(cart.subtotal().await.unwrap(), Money::from_cents(2000));

        cart.decrement(ProductId::new(1)).await.unwrap();
        let lines = cart.decrement(ProductId::new(1)).await.unwrap();
        assert!(lines.is_empty());
        assert_eq!(cart.subtotal().await.unwrap(), Money::ZERO);
    }

    #[tokio::test]
    async fn test_decrement_at_quantity_one_removes_line() {
        let cart = service();
        cart.add_item(&product(7, 500)).await.unwrap();
        let lines = cart.decrement(ProductId::new(7)).await.unwrap();
        assert!(lines.is_empty());
        assert!(cart.items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let cart = service();
        cart.add_item(&product(1, 1000)).await.unwrap();
        cart.remove_item(ProductId::new(99)).await.unwrap();
        assert_eq!(cart.items().await.unwrap().len(), 1);
        cart.remove_item(ProductId::new(1)).await.unwrap();
        cart.remove_item(ProductId::new(1)).await.unwrap();
        assert!(cart.items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_sequence_stores_nonpositive_quantity() {
        let cart = service();
        let p1 = product(1, 100);
        let p2 = product(2, 250);

        cart.add_item(&p1).await.unwrap();
        cart.add_item(&p2).await.unwrap();
        cart.add_item(&p2).await.unwrap();
        cart.decrement(ProductId::new(1)).await.unwrap();
        cart.decrement(ProductId::new(1)).await.unwrap();
        cart.increment(ProductId::new(2)).await.unwrap();
        cart.decrement(ProductId::new(2)).await.unwrap();
        cart.remove_item(ProductId::new(3)).await.unwrap();

        for line in cart.items().await.unwrap() {
            assert!(line.quantity >= 1);
        }
    }

    #[tokio::test]
    async fn test_clear_empties_cart_and_subtotal() {
        let cart = service();
        cart.add_item(&product(1, 1000)).await.unwrap();
        cart.clear().await.unwrap();
        assert!(cart.items().await.unwrap().is_empty());
        assert_eq!(cart.subtotal().await.unwrap(), Money::ZERO);
    }

    #[tokio::test]
    async fn test_malformed_stored_text_reads_as_empty() {
        let store = MemoryCartStore::default();
        store.write("not json at all {").await.unwrap();
        let cart = CartService::new(store);
        assert!(cart.items().await.unwrap().is_empty());
        assert_eq!(cart.subtotal().await.unwrap(), Money::ZERO);
    }

    #[tokio::test]
    async fn test_item_count_sums_quantities() {
        let cart = service();
        let p1 = product(1, 100);
        let p2 = product(2, 200);
        cart.add_item(&p1).await.unwrap();
        cart.add_item(&p1).await.unwrap();
        cart.add_item(&p2).await.unwrap();
        assert_eq!(cart.item_count().await.unwrap(), 3);
    }
}
