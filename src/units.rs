//! Expanded units
//!
//! A cart line of quantity `q` is expanded into `q` indistinguishable units so
//! that each unit can be taken or left on its own. Units only point back at the
//! line they came from; product data is never copied.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{
    cart::{CartError, CartLine},
    products::{Product, ProductId},
    weight::Weight,
};

/// One selectable unit of a cart line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit<'a> {
    line: usize,
    product: &'a Product<'a>,
}

impl<'a> Unit<'a> {
    /// Index of the source line in the cart slice.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The source product.
    pub fn product(&self) -> &'a Product<'a> {
        self.product
    }

    /// Unit price in minor units.
    pub fn price_minor(&self) -> i64 {
        self.product.price.to_minor_units()
    }

    /// Unit weight.
    pub fn weight(&self) -> Weight {
        self.product.weight
    }

    /// Unit value score.
    pub fn value(&self) -> u32 {
        u32::from(self.product.value_score.get())
    }
}

/// Aggregates over a set of units, in exact minor units and grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// Sum of value scores
    pub value: u32,

    /// Sum of weights
    pub weight: Weight,

    /// Sum of prices in minor units
    pub price_minor: i64,
}

impl Totals {
    /// Totals for `quantity` copies of `product`.
    pub fn of(product: &Product<'_>, quantity: u32) -> Self {
        Totals {
            value: u32::from(product.value_score.get()).saturating_mul(quantity),
            weight: product.weight.times(quantity),
            price_minor: product
                .price
                .to_minor_units()
                .saturating_mul(i64::from(quantity)),
        }
    }

    /// Fold another set of totals into this one.
    pub fn absorb(&mut self, other: Totals) {
        self.value = self.value.saturating_add(other.value);
        self.weight = self
            .weight
            .checked_add(other.weight)
            .unwrap_or(Weight::from_grams(u64::MAX));
        self.price_minor = self.price_minor.saturating_add(other.price_minor);
    }
}

/// Flat, indexed collection of every expanded unit of a cart.
#[derive(Debug)]
pub struct UnitPool<'a> {
    units: Vec<Unit<'a>>,
    line_count: usize,
}

impl<'a> UnitPool<'a> {
    /// Expand each line into `quantity` units, in cart order.
    pub fn expand(lines: &[CartLine<'a>]) -> Self {
        let capacity = lines
            .iter()
            .map(capacity_of)
            .fold(0_usize, usize::saturating_add);

        let mut units = Vec::with_capacity(capacity);

        for (line, cart_line) in lines.iter().enumerate() {
            let unit = Unit {
                line,
                product: cart_line.product(),
            };

            units.extend(std::iter::repeat_n(unit, capacity_of(cart_line)));
        }

        UnitPool {
            units,
            line_count: lines.len(),
        }
    }

    /// Iterate over the units in expansion order.
    pub fn iter(&self) -> impl Iterator<Item = &Unit<'a>> {
        self.units.iter()
    }

    /// Get a unit by its index.
    pub fn get(&self, idx: usize) -> Option<&Unit<'a>> {
        self.units.get(idx)
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether there are no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Count chosen units per source line.
    ///
    /// Indexes outside the pool are ignored.
    pub fn count_per_line(&self, chosen: impl IntoIterator<Item = usize>) -> SmallVec<[u32; 16]> {
        let mut counts: SmallVec<[u32; 16]> = SmallVec::from_elem(0, self.line_count);

        for idx in chosen {
            let Some(unit) = self.get(idx) else {
                continue;
            };

            if let Some(count) = counts.get_mut(unit.line) {
                *count = count.saturating_add(1);
            }
        }

        counts
    }
}

fn capacity_of(line: &CartLine<'_>) -> usize {
    usize::try_from(line.quantity()).unwrap_or(usize::MAX)
}

/// Reassemble per-line unit counts into cart lines.
///
/// Lines for the same product are merged; output follows the first appearance
/// of each product in `lines`, and products with a count of zero are omitted.
///
/// # Errors
///
/// Never fails for counts produced from `lines`; a [`CartError`] signals a
/// zero-quantity line slipping through.
pub fn assemble<'a>(
    lines: &[CartLine<'a>],
    counts: &[u32],
) -> Result<SmallVec<[CartLine<'a>; 10]>, CartError> {
    let mut merged: SmallVec<[(&'a Product<'a>, u32); 10]> = SmallVec::new();
    let mut positions: FxHashMap<ProductId, usize> = FxHashMap::default();

    for (line, &count) in lines.iter().zip(counts) {
        if count == 0 {
            continue;
        }

        let product = line.product();

        match positions.get(&product.id).and_then(|&pos| merged.get_mut(pos)) {
            Some((_, quantity)) => *quantity = quantity.saturating_add(count),
            None => {
                positions.insert(product.id, merged.len());
                merged.push((product, count));
            }
        }
    }

    merged
        .into_iter()
        .map(|(product, quantity)| CartLine::new(product, quantity))
        .collect()
}

/// Exact totals of a set of cart lines.
pub fn totals(lines: &[CartLine<'_>]) -> Totals {
    lines.iter().fold(Totals::default(), |mut acc, line| {
        acc.absorb(Totals::of(line.product(), line.quantity()));
        acc
    })
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::products::ValueScore;

    use super::*;

    fn product(id: u32, price: i64, grams: u64, score: u8) -> TestResult<Product<'static>> {
        Ok(Product::new(
            ProductId(id),
            format!("Product {id}"),
            Money::from_minor(price, USD),
            Weight::from_grams(grams),
            ValueScore::new(score)?,
        ))
    }

    #[test]
    fn expand_repeats_each_line_by_quantity() -> TestResult {
        let rice = product(1, 1299, 5000, 9)?;
        let milk = product(2, 349, 1030, 8)?;
        let lines = [CartLine::new(&rice, 2)?, CartLine::new(&milk, 3)?];

        let pool = UnitPool::expand(&lines);
        let sources: Vec<usize> = pool.iter().map(Unit::line).collect();

        assert_eq!(pool.len(), 5);
        assert_eq!(sources, vec![0, 0, 1, 1, 1]);

        Ok(())
    }

    #[test]
    fn expand_empty_cart_is_empty() {
        let pool = UnitPool::expand(&[]);

        assert!(pool.is_empty());
        assert!(pool.get(0).is_none());
    }

    #[test]
    fn count_per_line_ignores_out_of_range_indexes() -> TestResult {
        let rice = product(1, 1299, 5000, 9)?;
        let lines = [CartLine::new(&rice, 2)?];
        let pool = UnitPool::expand(&lines);

        let counts = pool.count_per_line([0, 1, 7]);

        assert_eq!(counts.as_slice(), &[2]);

        Ok(())
    }

    #[test]
    fn assemble_merges_and_omits_zero_counts() -> TestResult {
        let rice = product(1, 1299, 5000, 9)?;
        let milk = product(2, 349, 1030, 8)?;
        let lines = [
            CartLine::new(&milk, 2)?,
            CartLine::new(&rice, 1)?,
            CartLine::new(&milk, 1)?,
        ];

        let assembled = assemble(&lines, &[1, 0, 1])?;

        assert_eq!(assembled.len(), 1);
        assert_eq!(assembled.first().map(CartLine::quantity), Some(2));
        assert_eq!(
            assembled.first().map(|line| line.product().id),
            Some(ProductId(2))
        );

        Ok(())
    }

    #[test]
    fn totals_sum_exact_units() -> TestResult {
        let rice = product(1, 1299, 5000, 9)?;
        let milk = product(2, 349, 1030, 8)?;
        let lines = [CartLine::new(&rice, 1)?, CartLine::new(&milk, 2)?];

        let totals = totals(&lines);

        assert_eq!(totals.value, 25);
        assert_eq!(totals.weight, Weight::from_grams(7060));
        assert_eq!(totals.price_minor, 1997);

        Ok(())
    }
}
