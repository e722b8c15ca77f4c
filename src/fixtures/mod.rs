//! Fixtures
//!
//! YAML fixture sets live under a base directory, one file per kind:
//! `products/<name>.yml`, `coupons/<name>.yml` and `carts/<name>.yml`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    constraints::{ConstraintError, Constraints},
    coupons::Coupon,
    fixtures::{carts::CartFixture, coupons::CouponsFixture, products::ProductsFixture},
    products::{Product, ProductError, ProductId},
    weight::{Weight, WeightError},
};

pub mod carts;
pub mod coupons;
pub mod products;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Invalid weight
    #[error(transparent)]
    InvalidWeight(#[from] WeightError),

    /// Invalid product data
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Two products share a catalogue identifier
    #[error("Duplicate product id {0}")]
    DuplicateProductId(ProductId),

    /// Currency mismatch between fixtures
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// The cart fixture gives no value for a constraint and none was supplied
    #[error("No {0} in the cart fixture or on the command line")]
    MissingConstraint(&'static str),

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),

    /// Invalid constraints
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded products
    products: SlotMap<ProductKey, Product<'a>>,

    /// String key -> `SlotMap` key
    product_keys: FxHashMap<String, ProductKey>,

    /// Coupons in file order
    coupons: Vec<Coupon<'a>>,

    /// Cart lines in file order
    cart_lines: Vec<(ProductKey, u32)>,

    /// Budget from the cart fixture
    budget: Option<Money<'a, Currency>>,

    /// Weight limit from the cart fixture
    weight_limit: Option<Weight>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: SlotMap::with_key(),
            product_keys: FxHashMap::default(),
            coupons: Vec::new(),
            cart_lines: Vec::new(),
            budget: None,
            weight_limit: None,
            currency: None,
        }
    }

    fn read(&self, kind: &str, name: &str) -> Result<String, FixtureError> {
        let file_path = self.base_path.join(kind).join(format!("{name}.yml"));

        Ok(fs::read_to_string(file_path)?)
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a product is
    /// invalid, or if currencies are mixed.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = serde_norway::from_str(&self.read("products", name)?)?;

        for (key, product_fixture) in fixture.products {
            let product: Product<'static> = product_fixture.try_into()?;
            let currency = product.price.currency();

            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            if self.products.values().any(|existing| existing.id == product.id) {
                return Err(FixtureError::DuplicateProductId(product.id));
            }

            let product_key = self.products.insert(product);

            self.product_keys.insert(key, product_key);
        }

        Ok(self)
    }

    /// Load coupons from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if no products
    /// have been loaded, or if a coupon is in another currency.
    pub fn load_coupons(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let currency = self.currency()?;
        let fixture: CouponsFixture = serde_norway::from_str(&self.read("coupons", name)?)?;

        for coupon_fixture in fixture.coupons {
            self.coupons.push(coupon_fixture.try_into_coupon(currency)?);
        }

        Ok(self)
    }

    /// Load a cart and its constraints from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if it
    /// references a product that has not been loaded.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let currency = self.currency()?;
        let fixture: CartFixture = serde_norway::from_str(&self.read("carts", name)?)?;

        for line in fixture.lines {
            let product_key = self.product_key(&line.product)?;

            self.cart_lines.push((product_key, line.quantity));
        }

        if let Some(budget) = fixture.budget {
            self.budget = Some(products::parse_price_in(&budget, currency)?);
        }

        if let Some(weight_limit) = fixture.weight_limit {
            self.weight_limit = Some(weight_limit.parse()?);
        }

        Ok(self)
    }

    /// Load products and coupons from `catalogue` and the cart from `cart`
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(catalogue: &str, cart: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_products(catalogue)?
            .load_coupons(catalogue)?
            .load_cart(cart)?;

        Ok(fixture)
    }

    /// Get a product key by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_key(&self, key: &str) -> Result<ProductKey, FixtureError> {
        self.product_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// All products, ordered by catalogue identifier
    pub fn products(&self) -> Vec<&Product<'a>> {
        let mut products: Vec<_> = self.products.values().collect();

        products.sort_by_key(|product| product.id);

        products
    }

    /// Coupons in file order
    pub fn coupons(&self) -> &[Coupon<'a>] {
        &self.coupons
    }

    /// Build the cart described by the cart fixture
    ///
    /// # Errors
    ///
    /// Returns an error if no products are loaded, or if a line is invalid or
    /// exceeds stock.
    pub fn cart(&self) -> Result<Cart<'_>, FixtureError> {
        let mut cart = Cart::new(self.currency()?);

        for &(product_key, quantity) in &self.cart_lines {
            let product = self
                .products
                .get(product_key)
                .ok_or_else(|| FixtureError::ProductNotFound(format!("{product_key:?}")))?;

            cart.add_quantity(product, quantity)?;
        }

        Ok(cart)
    }

    /// Constraints from the cart fixture, with either value overridable
    ///
    /// # Errors
    ///
    /// Returns an error if a value is given neither by the fixture nor as an
    /// override, or if the budget is invalid.
    pub fn constraints(
        &self,
        budget: Option<Money<'a, Currency>>,
        weight_limit: Option<Weight>,
    ) -> Result<Constraints<'a>, FixtureError> {
        let budget = budget
            .or(self.budget)
            .ok_or(FixtureError::MissingConstraint("budget"))?;

        let weight_limit = weight_limit
            .or(self.weight_limit)
            .ok_or(FixtureError::MissingConstraint("weight limit"))?;

        Ok(Constraints::new(budget, weight_limit)?)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
