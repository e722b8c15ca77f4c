//! Cart Optimiser
//!
//! Picks the most valuable subset of a shopping cart that fits a budget and a
//! weight limit, then applies the single best coupon.
//!
//! Small carts are solved exactly with a bounded dynamic program over
//! individual units; carts with too many units, or budgets that are too
//! large, fall back to a greedy value-per-price heuristic. All money is
//! handled in integer minor units and all weights in whole grams.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod constraints;
pub mod coupons;
pub mod discounts;
pub mod fixtures;
pub mod optimiser;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod solvers;
pub mod units;
pub mod utils;
pub mod weight;
