//! Basket

use rusty_money::iso::Currency;
use thiserror::Error;

/// Errors related to basket construction.
#[derive(Debug, Error, PartialEq)]
pub enum BasketError {
    /// A line was created with a zero quantity.
    #[error("Basket line for {0} must have a quantity of at least 1")]
    InvalidQuantity(String),

    /// Adding to a line would overflow its quantity.
    #[error("Basket line for {0} overflowed its quantity")]
    QuantityOverflow(String),

    /// A line was not found in the basket.
    #[error("Line {0} not found")]
    LineNotFound(usize),
}

/// A product and its total quantity in the basket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketLine {
    product: String,
    quantity: u32,
}

impl BasketLine {
    /// Create a new basket line.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::InvalidQuantity`] if `quantity` is zero.
    pub fn new(product: impl Into<String>, quantity: u32) -> Result<Self, BasketError> {
        let product = product.into();

        if quantity == 0 {
            return Err(BasketError::InvalidQuantity(product));
        }

        Ok(Self { product, quantity })
    }

    /// Returns the product name
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Returns the quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Basket
#[derive(Debug, Clone, PartialEq)]
pub struct Basket {
    lines: Vec<BasketLine>,
    currency: &'static Currency,
}

impl Basket {
    /// Create a new, empty basket.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Basket {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a new basket with the given lines.
    ///
    /// Lines for the same product are merged into the first line for that
    /// product, so every line in the basket names a distinct product.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::QuantityOverflow`] if merged quantities overflow.
    pub fn with_lines(
        lines: impl IntoIterator<Item = BasketLine>,
        currency: &'static Currency,
    ) -> Result<Self, BasketError> {
        let mut basket = Self::new(currency);

        for line in lines {
            basket.push(line)?;
        }

        Ok(basket)
    }

    /// Add a quantity of a product to the basket.
    ///
    /// # Errors
    ///
    /// Returns a [`BasketError`] if `quantity` is zero or the line overflows.
    pub fn add(
        &mut self,
        product: impl Into<String>,
        quantity: u32,
    ) -> Result<&mut Self, BasketError> {
        self.push(BasketLine::new(product, quantity)?)?;

        Ok(self)
    }

    fn push(&mut self, line: BasketLine) -> Result<(), BasketError> {
        match self
            .lines
            .iter_mut()
            .find(|existing| existing.product == line.product)
        {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or(BasketError::QuantityOverflow(line.product))?;
            }
            None => self.lines.push(line),
        }

        Ok(())
    }

    /// Get a line from the basket.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError::LineNotFound` if the line is not found.
    pub fn get_line(&self, line: usize) -> Result<&BasketLine, BasketError> {
        self.lines.get(line).ok_or(BasketError::LineNotFound(line))
    }

    /// Iterate over the lines in the basket.
    pub fn iter(&self) -> impl Iterator<Item = &BasketLine> {
        self.lines.iter()
    }

    /// Get the number of lines in the basket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the basket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the basket.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
