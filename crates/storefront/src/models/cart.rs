//! The persisted cart.

use serde::{Deserialize, Serialize};

use cornershop_core::{ProductId, Quantity};

/// One product line in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Product this line refers to.
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Units of the product.
    pub quantity: Quantity,
}

/// The ordered list of cart entries, at most one per product.
///
/// Insertion only happens through [`Cart::add`], which increments an
/// existing line before appending a new one. Stored lists that still contain
/// duplicate ids are merged when decoded: the first occurrence keeps its
/// position and absorbs the quantities of the later ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// True when the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.quantity.get()))
            .sum()
    }

    /// Quantity of one product, if it is in the cart.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<Quantity> {
        self.entry(product_id).map(|entry| entry.quantity)
    }

    fn entry(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product_id == product_id)
    }

    fn entry_mut(&mut self, product_id: ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| e.product_id == product_id)
    }

    /// Add one unit: increments an existing line or appends a new one.
    ///
    /// Returns the line's new quantity.
    pub fn add(&mut self, product_id: ProductId) -> Quantity {
        if let Some(entry) = self.entry_mut(product_id) {
            entry.quantity = entry.quantity.incremented();
            return entry.quantity;
        }

        self.entries.push(CartEntry {
            product_id,
            quantity: Quantity::ONE,
        });
        Quantity::ONE
    }

    /// Overwrite a line's quantity. Returns `false` if the product is not in
    /// the cart.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: Quantity) -> bool {
        match self.entry_mut(product_id) {
            Some(entry) => {
                entry.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Drop a line. Returns `false` if the product was not in the cart.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.product_id != product_id);
        self.entries.len() != before
    }
}

impl From<Vec<CartEntry>> for Cart {
    fn from(stored: Vec<CartEntry>) -> Self {
        let mut cart = Self::new();
        for entry in stored {
            match cart.entry_mut(entry.product_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(entry.quantity);
                }
                None => cart.entries.push(entry),
            }
        }
        cart
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}
