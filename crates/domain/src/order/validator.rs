//! Default order validation rules.

use common::Money;

use super::{OrderError, OrderItem, OrderValidator};

/// Message for an order whose lines sum past the largest representable amount.
pub const TOTAL_OUT_OF_RANGE: &str = "Order total is out of range";

/// Validator enforcing non-empty orders, positive quantities and prices,
/// representable totals and an optional cap on the number of lines.
#[derive(Debug, Clone, Default)]
pub struct StandardOrderValidator {
    max_lines: Option<usize>,
}

impl StandardOrderValidator {
    /// Creates a validator without a line cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits orders to at most `max_lines` lines.
    pub fn with_max_lines(max_lines: usize) -> Self {
        Self {
            max_lines: Some(max_lines),
        }
    }
}

impl OrderValidator for StandardOrderValidator {
    fn validate(&self, items: &[OrderItem]) -> Result<(), OrderError> {
        if items.is_empty() {
            return Err(OrderError::Validation("Order must have items".to_string()));
        }

        if let Some(max) = self.max_lines {
            if items.len() > max {
                return Err(OrderError::Validation(format!(
                    "Order has {} lines, at most {max} allowed",
                    items.len()
                )));
            }
        }

        let mut total = Money::zero();
        for item in items {
            if item.quantity == 0 {
                return Err(OrderError::Validation(format!(
                    "Quantity for {} must be greater than 0",
                    item.product_id
                )));
            }
            if !item.unit_price.is_positive() {
                return Err(OrderError::Validation(format!(
                    "Price for {} must be greater than 0",
                    item.product_id
                )));
            }

            let line = item.total_price().ok_or_else(|| {
                OrderError::Validation(format!(
                    "Line total for {} is out of range",
                    item.product_id
                ))
            })?;
            total = total
                .checked_add(line)
                .ok_or_else(|| OrderError::Validation(TOTAL_OUT_OF_RANGE.to_string()))?;
        }

        Ok(())
    }
}
