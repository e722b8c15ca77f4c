//! Checkout tests against the fixture carts

use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use cart_optimiser::{
    checkout::{OptimisationResult, optimise_cart},
    config::OptimiserConfig,
    constraints::Constraints,
    fixtures::Fixture,
    orders::{OrderBook, UserId},
    receipt::Receipt,
    solvers::Method,
};

fn assert_consistent(result: &OptimisationResult<'_>, constraints: &Constraints<'_>) -> TestResult {
    assert!(result.total_price().to_minor_units() <= constraints.budget_minor());
    assert!(result.total_weight() <= constraints.weight_limit());
    assert_eq!(result.final_amount(), result.total_price().sub(result.discount())?);
    assert_eq!(result.savings(), result.original_subtotal().sub(result.final_amount())?);

    if let Some(coupon) = result.applied_coupon() {
        assert!(result.total_price().to_minor_units() >= coupon.min_cart_value.to_minor_units());
        assert!(result.discount().to_minor_units() <= coupon.max_discount.to_minor_units());
    } else {
        assert_eq!(result.discount(), Money::from_minor(0, USD));
    }

    Ok(())
}

#[test]
fn grocery_cart_is_solved_exactly() -> TestResult {
    let fixture = Fixture::from_set("grocery", "grocery")?;
    let cart = fixture.cart()?;
    let constraints = fixture.constraints(None, None)?;
    let config = OptimiserConfig::default();

    assert!(!cart.uses_heuristic(&constraints.budget(), &config));

    let result = optimise_cart(&cart, &constraints, fixture.coupons(), &config)?;

    assert_eq!(result.method(), Method::DynamicProgramming);
    assert!(result.total_value() > 0);
    assert_consistent(&result, &constraints)?;

    Ok(())
}

#[test]
fn bulk_cart_falls_back_to_greedy() -> TestResult {
    let fixture = Fixture::from_set("grocery", "bulk")?;
    let cart = fixture.cart()?;
    let constraints = fixture.constraints(None, None)?;
    let config = OptimiserConfig::default();

    assert_eq!(cart.unit_count(), 127);
    assert!(cart.uses_heuristic(&constraints.budget(), &config));

    let result = optimise_cart(&cart, &constraints, fixture.coupons(), &config)?;

    assert_eq!(result.method(), Method::Greedy);
    assert!(result.total_value() > 0);
    assert_consistent(&result, &constraints)?;

    Ok(())
}

#[test]
fn tight_budget_override_drops_the_coupon() -> TestResult {
    let fixture = Fixture::from_set("grocery", "grocery")?;
    let cart = fixture.cart()?;
    let constraints = fixture.constraints(Some(Money::from_minor(2_000, USD)), None)?;

    let result = optimise_cart(&cart, &constraints, fixture.coupons(), &OptimiserConfig::default())?;

    // Every coupon needs at least 50.00 spent.
    assert!(result.applied_coupon().is_none());
    assert_consistent(&result, &constraints)?;

    Ok(())
}

#[test]
fn checkout_places_an_order_and_prints_a_receipt() -> TestResult {
    let fixture = Fixture::from_set("grocery", "grocery")?;
    let cart = fixture.cart()?;
    let constraints = fixture.constraints(None, None)?;

    let result = optimise_cart(&cart, &constraints, fixture.coupons(), &OptimiserConfig::default())?;

    let mut orders = OrderBook::new();
    let key = orders.place(UserId(7), &result);
    let order = orders.get(key).ok_or("order missing")?;

    assert_eq!(order.final_amount, result.final_amount());
    assert_eq!(orders.for_user(UserId(7)).len(), 1);

    let mut out = Vec::new();
    Receipt::new(&result).write_to(&mut out)?;
    let text = String::from_utf8(out)?;

    assert!(text.contains("Total"));
    assert!(text.contains("dynamic programming"));

    Ok(())
}
