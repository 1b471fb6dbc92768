//! Order state

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use thiserror::Error;

/// Errors raised by order state transitions and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderStateError {
    /// The order has already been confirmed and paid.
    #[error("order has already been captured")]
    AlreadyCaptured,

    /// A stored status string is not recognised.
    #[error("unknown status: {0}")]
    UnknownStatus(String),
}

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Created, awaiting payment capture.
    Pending,

    /// Payment captured, stock taken.
    Confirmed,
}

impl OrderStatus {
    /// Stored/wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderStateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            other => Err(OrderStateError::UnknownStatus(other.to_string())),
        }
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    /// No payment captured yet.
    Pending,

    /// Payment captured.
    Paid,
}

impl PaymentStatus {
    /// Stored/wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = OrderStateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(OrderStateError::UnknownStatus(other.to_string())),
        }
    }
}

/// Combined order and payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderState {
    /// Fulfilment status.
    pub order: OrderStatus,

    /// Payment status.
    pub payment: PaymentStatus,
}

impl OrderState {
    /// State of a freshly created order.
    pub const PENDING: Self = Self {
        order: OrderStatus::Pending,
        payment: PaymentStatus::Pending,
    };

    /// State of a captured order.
    pub const CONFIRMED: Self = Self {
        order: OrderStatus::Confirmed,
        payment: PaymentStatus::Paid,
    };

    /// Transition to confirmed/paid after a successful capture.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStateError::AlreadyCaptured`] unless the order is still awaiting payment.
    pub fn confirm(self) -> Result<Self, OrderStateError> {
        if self.payment == PaymentStatus::Paid || self.order == OrderStatus::Confirmed {
            return Err(OrderStateError::AlreadyCaptured);
        }

        Ok(Self::CONFIRMED)
    }
}
