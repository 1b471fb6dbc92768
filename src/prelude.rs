//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    orders::{OrderState, OrderStateError, OrderStatus, PaymentStatus},
    prices::Price,
    pricing::{
        PricedLine, PricingError, order_total, to_major_units, to_minor_units,
        verify_declared_total,
    },
    stock::{StockDecrement, StockError, StockRequest, plan_stock_decrements},
};
