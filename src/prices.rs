//! Prices

use std::ops::Deref;

/// Represents a price in pence/cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Price {
    value: u64,
}

impl Price {
    /// Creates a new Price
    pub const fn new(value: u64) -> Self {
        Price { value }
    }

    /// The unit price a customer actually pays.
    ///
    /// A sale price of zero means the product is not on sale, so the base price applies.
    pub const fn effective(base: u64, sale: u64) -> Self {
        if sale > 0 {
            Price::new(sale)
        } else {
            Price::new(base)
        }
    }
}

impl Deref for Price {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl From<u64> for Price {
    fn from(value: u64) -> Self {
        Price::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_price() {
        let price = Price::new(1000);

        assert_eq!(price.value, 1000);
    }

    #[test]
    fn price_derefs_to_u64() {
        let price = Price { value: 100 };

        assert_eq!(*price, 100);
    }

    #[test]
    fn effective_price_uses_sale_price_when_positive() {
        assert_eq!(Price::effective(50_00, 40_00), Price::new(40_00));
    }

    #[test]
    fn effective_price_falls_back_to_base_price_without_sale() {
        assert_eq!(Price::effective(50_00, 0), Price::new(50_00));
    }
}
