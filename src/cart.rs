//! Cart

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    config::OptimiserConfig,
    pricing::{TotalPriceError, subtotal},
    products::{Product, ProductId},
};

/// Errors related to cart construction or edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A cart line must hold at least one unit.
    #[error("product {0} has a quantity of zero")]
    ZeroQuantity(ProductId),

    /// Adding would take the line past the product's stock.
    #[error("product {product} only has {stock} in stock")]
    OutOfStock {
        /// Product that ran out
        product: ProductId,

        /// Units available
        stock: u32,
    },

    /// A product's currency differs from the cart currency (product, product currency, cart currency).
    #[error("product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),
}

/// A product and how many units of it are wanted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartLine<'a> {
    product: &'a Product<'a>,
    quantity: u32,
}

impl<'a> CartLine<'a> {
    /// Create a cart line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `quantity` is zero.
    pub fn new(product: &'a Product<'a>, quantity: u32) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity(product.id));
        }

        Ok(CartLine { product, quantity })
    }

    /// The product on this line.
    pub fn product(&self) -> &'a Product<'a> {
        self.product
    }

    /// Number of units, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price multiplied by quantity, in minor units.
    pub fn line_total_minor(&self) -> i64 {
        self.product
            .price
            .to_minor_units()
            .saturating_mul(i64::from(self.quantity))
    }
}

/// A shopper's cart.
///
/// Lines are kept in the order products were first added, and each product
/// appears on at most one line.
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    lines: SmallVec<[CartLine<'a>; 10]>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: SmallVec::new(),
            currency,
        }
    }

    /// Create a cart from existing lines, merging lines for the same product.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] on a currency mismatch or if a merged line would exceed stock.
    pub fn with_lines(
        lines: impl IntoIterator<Item = CartLine<'a>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let mut cart = Cart::new(currency);

        for line in lines {
            cart.add_quantity(line.product, line.quantity)?;
        }

        Ok(cart)
    }

    /// Add one unit of a product, creating its line if needed.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] on a currency mismatch or if stock would be exceeded.
    pub fn add(&mut self, product: &'a Product<'a>) -> Result<(), CartError> {
        self.add_quantity(product, 1)
    }

    /// Add `quantity` units of a product.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] on a zero quantity, a currency mismatch, or if stock would be exceeded.
    pub fn add_quantity(&mut self, product: &'a Product<'a>, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity(product.id));
        }

        self.check_currency(product)?;

        let wanted = self.quantity_of(product.id).saturating_add(quantity);

        if wanted > product.stock {
            return Err(CartError::OutOfStock {
                product: product.id,
                stock: product.stock,
            });
        }

        match self.line_mut(product.id) {
            Some(line) => line.quantity = wanted,
            None => self.lines.push(CartLine::new(product, quantity)?),
        }

        Ok(())
    }

    /// Set the quantity of a product already in the cart; zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] if the product has no line, or
    /// [`CartError::OutOfStock`] if the quantity exceeds stock.
    pub fn set_quantity(&mut self, product: ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove(product);
        }

        let line = self.line_mut(product).ok_or(CartError::NotInCart(product))?;

        if quantity > line.product.stock {
            return Err(CartError::OutOfStock {
                product,
                stock: line.product.stock,
            });
        }

        line.quantity = quantity;

        Ok(())
    }

    /// Remove a product's line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] if the product has no line.
    pub fn remove(&mut self, product: ProductId) -> Result<(), CartError> {
        let before = self.lines.len();

        self.lines.retain(|line| line.product.id != product);

        if self.lines.len() == before {
            return Err(CartError::NotInCart(product));
        }

        Ok(())
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Units of `product` in the cart.
    pub fn quantity_of(&self, product: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product.id == product)
            .map_or(0, CartLine::quantity)
    }

    /// Total number of units across all lines.
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Price of everything in the cart before optimisation or coupons.
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if the subtotal overflows.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        subtotal(&self.lines, self.currency)
    }

    /// Whether optimising this cart against `budget` would fall back to the
    /// greedy heuristic.
    pub fn uses_heuristic(&self, budget: &Money<'_, Currency>, config: &OptimiserConfig) -> bool {
        config.exceeds_exact_limits(self.unit_count(), budget)
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn line_mut(&mut self, product: ProductId) -> Option<&mut CartLine<'a>> {
        self.lines.iter_mut().find(|line| line.product.id == product)
    }

    fn check_currency(&self, product: &Product<'_>) -> Result<(), CartError> {
        let product_currency = product.price.currency();

        if product_currency == self.currency {
            Ok(())
        } else {
            Err(CartError::CurrencyMismatch(
                product.id,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ))
        }
    }
}
