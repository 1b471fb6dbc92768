//! Stock

use thiserror::Error;

/// Errors raised while checking stock for a capture.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StockError {
    /// More units were requested than are available.
    #[error("not enough stock for product: {title} (requested {requested}, available {available})")]
    Insufficient {
        /// Product title, used for customer-facing messages.
        title: String,

        /// Total units requested across the order.
        requested: u64,

        /// Units currently in stock.
        available: u64,
    },
}

/// A request to take `requested` units of a product with `available` units in stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRequest<K> {
    /// Product identifier.
    pub product: K,

    /// Product title.
    pub title: String,

    /// Units requested by this line.
    pub requested: u32,

    /// Units currently in stock.
    pub available: u64,
}

/// A stock change that is safe to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDecrement<K> {
    /// Product identifier.
    pub product: K,

    /// Units to remove from stock.
    pub quantity: u64,

    /// Units left once the decrement is applied.
    pub remaining: u64,
}

/// Check every request against available stock and plan the decrements.
///
/// Requests for the same product are combined, so an order that lists a product twice cannot
/// take more than is in stock. Either every request fits and a decrement per product is
/// returned (in first-seen order), or nothing is planned.
///
/// # Errors
///
/// Returns [`StockError::Insufficient`] for the first product whose combined request exceeds
/// its available stock.
pub fn plan_stock_decrements<K>(
    requests: &[StockRequest<K>],
) -> Result<Vec<StockDecrement<K>>, StockError>
where
    K: Copy + PartialEq,
{
    let mut planned: Vec<(&StockRequest<K>, u64)> = Vec::with_capacity(requests.len());

    for request in requests {
        let requested = u64::from(request.requested);

        match planned
            .iter_mut()
            .find(|(seen, _)| seen.product == request.product)
        {
            Some((_, total)) => *total = total.saturating_add(requested),
            None => planned.push((request, requested)),
        }
    }

    planned
        .into_iter()
        .map(|(request, quantity)| {
            let remaining =
                request
                    .available
                    .checked_sub(quantity)
                    .ok_or_else(|| StockError::Insufficient {
                        title: request.title.clone(),
                        requested: quantity,
                        available: request.available,
                    })?;

            Ok(StockDecrement {
                product: request.product,
                quantity,
                remaining,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn request(product: u8, requested: u32, available: u64) -> StockRequest<u8> {
        StockRequest {
            product,
            title: format!("Product {product}"),
            requested,
            available,
        }
    }

    #[test]
    fn decrement_within_stock_leaves_remainder() -> TestResult {
        let planned = plan_stock_decrements(&[request(1, 2, 10)])?;

        assert_eq!(
            planned,
            vec![StockDecrement {
                product: 1,
                quantity: 2,
                remaining: 8,
            }]
        );

        Ok(())
    }

    #[test]
    fn taking_all_stock_leaves_zero() -> TestResult {
        let planned = plan_stock_decrements(&[request(1, 5, 5)])?;

        assert_eq!(planned.first().map(|d| d.remaining), Some(0));

        Ok(())
    }

    #[test]
    fn insufficient_stock_is_rejected() {
        let result = plan_stock_decrements(&[request(1, 10, 5)]);

        assert_eq!(
            result,
            Err(StockError::Insufficient {
                title: "Product 1".to_string(),
                requested: 10,
                available: 5,
            })
        );
    }

    #[test]
    fn later_shortfall_plans_nothing() {
        let result = plan_stock_decrements(&[request(1, 1, 10), request(2, 3, 2)]);

        assert!(
            matches!(result, Err(StockError::Insufficient { ref title, .. }) if title == "Product 2"),
            "expected Insufficient for product 2, got {result:?}"
        );
    }

    #[test]
    fn repeated_products_are_combined() {
        let result = plan_stock_decrements(&[request(1, 3, 5), request(1, 3, 5)]);

        assert!(
            matches!(
                result,
                Err(StockError::Insufficient {
                    requested: 6,
                    available: 5,
                    ..
                })
            ),
            "expected combined request to exceed stock, got {result:?}"
        );
    }

    #[test]
    fn no_requests_plans_nothing() -> TestResult {
        let planned = plan_stock_decrements::<u8>(&[])?;

        assert!(planned.is_empty());

        Ok(())
    }
}
