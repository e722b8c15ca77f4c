//! Orders
//!
//! Records of completed checkouts. An order copies the figures of the
//! optimisation it came from and is stamped with who placed it and when.

use std::fmt;

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::{cart::CartLine, checkout::OptimisationResult};

new_key_type! {
    /// Order Key
    pub struct OrderKey;
}

/// Identifier of the shopper placing an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user {}", self.0)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order<'a> {
    /// Who placed it
    pub user: UserId,

    /// Lines bought
    pub lines: SmallVec<[CartLine<'a>; 10]>,

    /// Price of the lines before discount
    pub total_price: Money<'a, Currency>,

    /// Coupon discount
    pub discount: Money<'a, Currency>,

    /// Amount paid
    pub final_amount: Money<'a, Currency>,

    /// Code of the applied coupon
    pub coupon_code: Option<String>,

    /// When it was placed
    pub placed_at: Timestamp,

    /// Whether the lines came from an optimisation pass
    pub optimised: bool,
}

impl<'a> Order<'a> {
    /// Build an order from an optimisation result.
    pub fn from_result(user: UserId, result: &OptimisationResult<'a>, placed_at: Timestamp) -> Self {
        Order {
            user,
            lines: result.to_lines(),
            total_price: result.total_price(),
            discount: result.discount(),
            final_amount: result.final_amount(),
            coupon_code: result.applied_coupon().map(|coupon| coupon.code.clone()),
            placed_at,
            optimised: true,
        }
    }
}

/// In-memory store of placed orders.
#[derive(Debug, Default)]
pub struct OrderBook<'a> {
    orders: SlotMap<OrderKey, Order<'a>>,
}

impl<'a> OrderBook<'a> {
    /// Create an empty order book.
    pub fn new() -> Self {
        OrderBook {
            orders: SlotMap::with_key(),
        }
    }

    /// Record an order for `result`, stamped now.
    pub fn place(&mut self, user: UserId, result: &OptimisationResult<'a>) -> OrderKey {
        self.place_at(user, result, Timestamp::now())
    }

    /// Record an order for `result` with an explicit timestamp.
    pub fn place_at(
        &mut self,
        user: UserId,
        result: &OptimisationResult<'a>,
        placed_at: Timestamp,
    ) -> OrderKey {
        self.orders
            .insert(Order::from_result(user, result, placed_at))
    }

    /// Look up an order.
    pub fn get(&self, key: OrderKey) -> Option<&Order<'a>> {
        self.orders.get(key)
    }

    /// Orders placed by `user`, newest first.
    pub fn for_user(&self, user: UserId) -> Vec<(OrderKey, &Order<'a>)> {
        let mut orders: Vec<_> = self
            .orders
            .iter()
            .filter(|(_, order)| order.user == user)
            .collect();

        orders.sort_by(|(_, a), (_, b)| b.placed_at.cmp(&a.placed_at));

        orders
    }

    /// Number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no orders have been placed.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{
        cart::Cart,
        config::OptimiserConfig,
        checkout::optimise_cart,
        constraints::Constraints,
        products::{Product, ProductId, ValueScore},
        weight::Weight,
    };

    use super::*;

    #[test]
    fn orders_are_listed_newest_first_per_user() -> TestResult {
        let milk = Product::new(
            ProductId(2),
            "Organic Whole Milk (1L)",
            Money::from_minor(349, USD),
            Weight::from_grams(1030),
            ValueScore::new(8)?,
        );
        let mut cart = Cart::new(USD);
        cart.add_quantity(&milk, 2)?;

        let constraints = Constraints::new(Money::from_minor(1_000, USD), Weight::from_kg(5))?;
        let result = optimise_cart(&cart, &constraints, &[], &OptimiserConfig::default())?;

        let mut book = OrderBook::new();
        let first = book.place_at(UserId(1), &result, Timestamp::from_second(1_700_000_000)?);
        let second = book.place_at(UserId(1), &result, Timestamp::from_second(1_700_000_600)?);
        book.place_at(UserId(2), &result, Timestamp::from_second(1_700_000_300)?);

        let keys: Vec<OrderKey> = book.for_user(UserId(1)).into_iter().map(|(k, _)| k).collect();

        assert_eq!(keys, vec![second, first]);
        assert_eq!(book.len(), 3);

        Ok(())
    }

    #[test]
    fn order_copies_result_figures() -> TestResult {
        let milk = Product::new(
            ProductId(2),
            "Organic Whole Milk (1L)",
            Money::from_minor(349, USD),
            Weight::from_grams(1030),
            ValueScore::new(8)?,
        );
        let mut cart = Cart::new(USD);
        cart.add_quantity(&milk, 3)?;

        let constraints = Constraints::new(Money::from_minor(700, USD), Weight::from_kg(5))?;
        let result = optimise_cart(&cart, &constraints, &[], &OptimiserConfig::default())?;

        let mut book = OrderBook::new();
        let key = book.place(UserId(7), &result);
        let order = book.get(key).ok_or("order missing")?;

        assert!(order.optimised);
        assert_eq!(order.user, UserId(7));
        assert_eq!(order.lines.first().map(CartLine::quantity), Some(2));
        assert_eq!(order.final_amount, Money::from_minor(698, USD));
        assert!(order.coupon_code.is_none());

        Ok(())
    }
}
