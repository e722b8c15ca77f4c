//! Cart Optimiser
//!
//! Loads a fixture catalogue and cart, optimises the cart and prints a receipt.
//!
//! Use `-c` to pick the catalogue fixture set and `--cart` to pick the cart
//! Use `-b` and `-w` to override the cart fixture's budget and weight limit

use std::{
    io::{self, Write},
    time::Instant,
};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cart_optimiser::{
    checkout::optimise_cart,
    fixtures::{Fixture, products::parse_price_in},
    orders::{OrderBook, UserId},
    receipt::Receipt,
    utils::OptimiseArgs,
};

/// Cart optimiser entry point
pub fn main() -> Result<()> {
    let args = OptimiseArgs::parse();

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let config = args.optimiser_config()?;
    let fixture = Fixture::from_set(&args.catalogue, &args.cart)?;
    let currency = fixture.currency()?;

    let budget = match args.budget.as_deref() {
        Some(budget) => Some(parse_price_in(budget, currency)?),
        None => None,
    };

    let constraints = fixture.constraints(budget, args.weight_limit)?;
    let cart = fixture.cart()?;

    if cart.uses_heuristic(&constraints.budget(), &config) {
        warn!(
            units = cart.unit_count(),
            "large cart: the result comes from the greedy heuristic and may not be optimal"
        );
    }

    let start = Instant::now();
    let result = optimise_cart(&cart, &constraints, fixture.coupons(), &config)?;
    let elapsed = start.elapsed();

    let mut orders = OrderBook::new();
    let order_key = orders.place(UserId(args.user), &result);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::new(&result).write_to(&mut handle)?;

    if let Some(order) = orders.get(order_key) {
        writeln!(handle, " Order for {} placed at {}", order.user, order.placed_at)?;
    }

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
