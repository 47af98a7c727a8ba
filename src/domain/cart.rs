use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::error::CheckoutError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub tier_id: i64,
    pub quantity: i32,
}

/// Validated once at the order boundary, then carried unchanged through
/// verification and settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new(lines: Vec<CartLine>) -> Result<Self, CheckoutError> {
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut seen = HashSet::new();
        for line in &lines {
            if line.quantity <= 0 {
                return Err(CheckoutError::InvalidQuantity(line.tier_id));
            }
            if !seen.insert(line.tier_id) {
                return Err(CheckoutError::DuplicateCartLine(line.tier_id));
            }
        }

        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }
}
