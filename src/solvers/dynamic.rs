//! Bounded dynamic program
//!
//! A 0/1 knapsack over expanded units, indexed by discretised budget. Each
//! budget level holds the best `(value, spend, weight, chosen units)` seen so
//! far, and only two such layers are ever alive: the one for the previous
//! unit and the one being filled for the current unit.
//!
//! Prices are discretised to a configurable number of decimal digits by
//! flooring, and only pick the level a selection lands on. Every cell also
//! carries its exact spend in minor units and its exact weight in grams, and
//! an extension is rejected when either would go over the exact budget or
//! weight limit, so anything the program selects fits without rounding.

use smallvec::SmallVec;
use tracing::debug;

use crate::{
    cart::CartLine,
    config::OptimiserConfig,
    constraints::Constraints,
    solvers::{Method, Selection, Solver, SolverError},
    units::{Unit, UnitPool},
};

/// Solver using a rolling two-layer dynamic program.
#[derive(Debug)]
pub struct DynamicSolver;

impl Solver for DynamicSolver {
    const METHOD: Method = Method::DynamicProgramming;

    fn solve(
        lines: &[CartLine<'_>],
        constraints: &Constraints<'_>,
        config: &OptimiserConfig,
    ) -> Result<Selection, SolverError> {
        let pool = UnitPool::expand(lines);
        let grid = Grid::new(constraints, config);

        debug!(
            units = pool.len(),
            budget_steps = grid.budget_steps,
            weight_cap_grams = grid.weight_cap,
            "running bounded dynamic program"
        );

        let mut layers = Layers::new(grid.budget_steps, pool.len());

        // A unit that can never fit would leave every level unchanged.
        for (idx, unit) in pool.iter().enumerate() {
            if let Some(cost) = grid.cost_of(unit) {
                layers.push_unit(idx, cost, &grid);
            }
        }

        let best = layers.best().ok_or(SolverError::InvariantViolation {
            message: "dynamic program has no budget levels",
        })?;

        Ok(pool.count_per_line(best.chosen.iter_ones()))
    }
}

/// Capacities of one optimisation.
#[derive(Debug, Clone, Copy)]
struct Grid {
    /// Highest budget level (inclusive)
    budget_steps: usize,

    /// Minor units per budget level
    price_step: u64,

    /// Exact budget in minor units
    budget: u64,

    /// Exact weight limit in grams, capped by the configured weight steps
    weight_cap: u64,
}

/// A unit's footprint: its budget level offset plus exact spend and weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UnitCost {
    level: usize,
    price: u64,
    grams: u64,
    value: u32,
}

impl Grid {
    fn new(constraints: &Constraints<'_>, config: &OptimiserConfig) -> Self {
        let price_step = u64::try_from(config.price_step(constraints.currency()))
            .unwrap_or(u64::MAX)
            .max(1);

        let budget = u64::try_from(constraints.budget_minor()).unwrap_or(0);
        let budget_steps = (budget / price_step).min(u64::from(config.max_budget_steps));

        let weight_cap = constraints
            .weight_limit()
            .grams()
            .min(u64::from(config.max_weight_steps).saturating_mul(config.weight_step()));

        Grid {
            budget_steps: usize::try_from(budget_steps).unwrap_or(usize::MAX),
            price_step,
            budget,
            weight_cap,
        }
    }

    /// Footprint of `unit`, or `None` if it can never fit.
    fn cost_of(&self, unit: &Unit<'_>) -> Option<UnitCost> {
        let price = u64::try_from(unit.price_minor()).ok()?;
        let level = usize::try_from(price / self.price_step).ok()?;
        let grams = unit.weight().grams();

        if level > self.budget_steps || price > self.budget || grams > self.weight_cap {
            return None;
        }

        Some(UnitCost {
            level,
            price,
            grams,
            value: unit.value(),
        })
    }
}

/// Fixed-width bit set of chosen unit indexes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct UnitMask {
    words: SmallVec<[u64; 2]>,
}

impl UnitMask {
    fn with_units(units: usize) -> Self {
        UnitMask {
            words: SmallVec::from_elem(0, units.div_ceil(64)),
        }
    }

    fn insert(&mut self, idx: usize) {
        if let Some(word) = self.words.get_mut(idx / 64) {
            *word |= 1_u64 << (idx % 64);
        }
    }

    fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(word_idx, &word)| {
            (0..64_usize)
                .filter(move |bit| word & (1_u64 << bit) != 0)
                .map(move |bit| word_idx * 64 + bit)
        })
    }
}

/// Best known selection at one budget level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Cell {
    value: u32,
    spent: u64,
    grams: u64,
    chosen: UnitMask,
}

impl Cell {
    fn empty(units: usize) -> Self {
        Cell {
            value: 0,
            spent: 0,
            grams: 0,
            chosen: UnitMask::with_units(units),
        }
    }

    /// Whether adding `cost` keeps this cell within the exact limits.
    fn fits(&self, cost: UnitCost, grid: &Grid) -> bool {
        self.spent.saturating_add(cost.price) <= grid.budget
            && self.grams.saturating_add(cost.grams) <= grid.weight_cap
    }

    /// Become `src` plus unit `idx`.
    fn extend_from(&mut self, src: &Cell, idx: usize, cost: UnitCost) {
        self.value = src.value + cost.value;
        self.spent = src.spent + cost.price;
        self.grams = src.grams + cost.grams;
        self.chosen.clone_from(&src.chosen);
        self.chosen.insert(idx);
    }
}

/// The previous and current layers, swapped after every unit.
#[derive(Debug)]
struct Layers {
    prev: Vec<Cell>,
    curr: Vec<Cell>,
}

impl Layers {
    fn new(budget_steps: usize, units: usize) -> Self {
        let levels = budget_steps.saturating_add(1);

        Layers {
            prev: vec![Cell::empty(units); levels],
            curr: vec![Cell::empty(units); levels],
        }
    }

    /// Fill the current layer from the previous one, considering unit `idx`.
    ///
    /// A level adopts "previous plus this unit" only when that stays within
    /// the exact budget and weight limit and is strictly more valuable.
    fn push_unit(&mut self, idx: usize, cost: UnitCost, grid: &Grid) {
        for (budget, cell) in self.curr.iter_mut().enumerate() {
            let Some(keep) = self.prev.get(budget) else {
                continue;
            };

            cell.clone_from(keep);

            let Some(src) = budget
                .checked_sub(cost.level)
                .and_then(|rest| self.prev.get(rest))
            else {
                continue;
            };

            if src.fits(cost, grid) && src.value + cost.value > cell.value {
                cell.extend_from(src, idx, cost);
            }
        }

        std::mem::swap(&mut self.prev, &mut self.curr);
    }

    /// Highest value over all budget levels; the lowest level wins ties.
    fn best(&self) -> Option<&Cell> {
        self.prev.iter().fold(None, |best: Option<&Cell>, cell| match best {
            Some(incumbent) if cell.value <= incumbent.value => Some(incumbent),
            _ => Some(cell),
        })
    }
}
