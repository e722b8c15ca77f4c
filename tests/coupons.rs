//! Integration tests for coupon selection

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use cart_optimiser::{
    cart::CartLine,
    coupons::{Coupon, select_best},
    products::{Product, ProductId, ValueScore},
    weight::Weight,
};

fn coupon(id: u32, code: &str, min: i64, percent: f64, cap: i64) -> Coupon<'static> {
    Coupon {
        id,
        code: code.to_string(),
        min_cart_value: Money::from_minor(min, USD),
        discount_percent: Percentage::from(percent),
        max_discount: Money::from_minor(cap, USD),
        description: String::new(),
    }
}

fn hamper(price: i64) -> TestResult<Product<'static>> {
    Ok(Product::new(
        ProductId(99),
        "Hamper",
        Money::from_minor(price, USD),
        Weight::from_kg(3),
        ValueScore::new(5)?,
    ))
}

#[test]
fn larger_discount_beats_lower_threshold() -> TestResult {
    let coupons = [
        coupon(1, "SAVE20", 10_000, 0.20, 5_000),
        coupon(3, "FLAT15", 7_500, 0.15, 2_500),
    ];
    let hamper = hamper(5_000)?;
    let lines = [CartLine::new(&hamper, 3)?];

    let selection = select_best(&coupons, &lines, USD)?;

    assert_eq!(selection.coupon().map(|c| c.id), Some(1));
    assert_eq!(selection.subtotal(), Money::from_minor(15_000, USD));
    assert_eq!(selection.discount(), Money::from_minor(3_000, USD));
    assert_eq!(selection.final_amount(), Money::from_minor(12_000, USD));

    Ok(())
}

#[test]
fn below_every_threshold_pays_full_price() -> TestResult {
    let coupons = [
        coupon(1, "SAVE20", 10_000, 0.20, 5_000),
        coupon(3, "FLAT15", 7_500, 0.15, 2_500),
    ];
    let hamper = hamper(4_000)?;
    let lines = [CartLine::new(&hamper, 1)?];

    let selection = select_best(&coupons, &lines, USD)?;

    assert!(selection.coupon().is_none());
    assert_eq!(selection.discount(), Money::from_minor(0, USD));
    assert_eq!(selection.final_amount(), Money::from_minor(4_000, USD));

    Ok(())
}

#[test]
fn cap_limits_discount_on_large_carts() -> TestResult {
    let coupons = [
        coupon(1, "SAVE20", 10_000, 0.20, 5_000),
        coupon(2, "MEGA30", 20_000, 0.30, 8_000),
        coupon(4, "SUPER40", 30_000, 0.40, 12_000),
    ];
    let hamper = hamper(10_000)?;
    let lines = [CartLine::new(&hamper, 5)?];

    let selection = select_best(&coupons, &lines, USD)?;

    // 40% of 500.00 is 200.00, capped at 120.00.
    assert_eq!(selection.coupon().map(|c| c.code.as_str()), Some("SUPER40"));
    assert_eq!(selection.discount(), Money::from_minor(12_000, USD));
    assert_eq!(selection.final_amount(), Money::from_minor(38_000, USD));

    Ok(())
}

#[test]
fn selection_is_stable_across_runs() -> TestResult {
    let coupons = [
        coupon(3, "FLAT15", 7_500, 0.15, 2_500),
        coupon(5, "WELCOME10", 5_000, 0.10, 2_500),
        coupon(1, "SAVE20", 10_000, 0.20, 2_500),
    ];
    let hamper = hamper(25_000)?;
    let lines = [CartLine::new(&hamper, 1)?];

    let first = select_best(&coupons, &lines, USD)?;

    for _ in 0..5 {
        assert_eq!(select_best(&coupons, &lines, USD)?, first);
    }

    assert_eq!(first.coupon().map(|c| c.id), Some(3));

    Ok(())
}

#[test]
fn empty_cart_gets_no_coupon() -> TestResult {
    let coupons = [coupon(5, "WELCOME10", 0, 0.10, 1_500)];

    let selection = select_best(&coupons, &[], USD)?;

    assert!(selection.coupon().is_none());
    assert_eq!(selection.final_amount(), Money::from_minor(0, USD));

    Ok(())
}
