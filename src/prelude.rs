//! Cart optimiser prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine},
    checkout::{CheckoutError, OptimisationResult, optimise_cart},
    config::{ConfigError, OptimiserConfig},
    constraints::{ConstraintError, Constraints},
    coupons::{Coupon, CouponError, CouponSelection, calculate_savings, select_best},
    optimiser::{KnapsackResult, OptimiseError, optimise},
    orders::{Order, OrderBook, OrderKey, UserId},
    products::{Product, ProductError, ProductId, ValueScore},
    receipt::{Receipt, ReceiptError},
    solvers::{
        Method, Selection, Solver, SolverError, dynamic::DynamicSolver, greedy::GreedySolver,
    },
    weight::{Weight, WeightError},
};
