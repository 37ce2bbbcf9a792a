//! Geometric cost curve for buying units.
//!
//! The `k`-th unit after `owned` costs `base_cost * coefficient^(owned + k)`,
//! so buying `n` more is a geometric series starting at
//! `base_term = base_cost * coefficient^owned`.

use super::state::Business;

fn base_term(business: &Business) -> f64 {
    business.base_cost * business.cost_coefficient.powf(business.owned as f64)
}

/// Price of the next `n` units, truncated to a whole amount.
pub fn cost_of_next(business: &Business, n: u32) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let term = base_term(business);
    let c = business.cost_coefficient;
    let cost = if c == 1.0 {
        term * n as f64
    } else {
        term * (c.powf(n as f64) - 1.0) / (c - 1.0)
    };
    if cost.is_nan() {
        0.0
    } else {
        cost.trunc()
    }
}

/// Largest `n` with `cost_of_next(business, n) <= budget`.
pub fn max_affordable(business: &Business, budget: f64) -> u32 {
    let term = base_term(business);
    if !(term.is_finite() && term > 0.0) || !(budget >= 0.0) {
        return 0;
    }
    // Prices are truncated, so `n` is affordable exactly when the untruncated
    // series stays below the next whole amount.
    let limit = budget.floor() + 1.0;
    let c = business.cost_coefficient;
    let estimate = if c == 1.0 {
        (limit / term).floor()
    } else {
        (1.0 + limit * (c - 1.0) / term).ln() / c.ln()
    };
    let mut n = if estimate.is_finite() && estimate > 0.0 {
        estimate.floor().min(u32::MAX as f64) as u32
    } else {
        0
    };

    // Floating point can miss by one either way at the boundary.
    while n > 0 && cost_of_next(business, n) > budget {
        n -= 1;
    }
    while n < u32::MAX && cost_of_next(business, n + 1) <= budget {
        n += 1;
    }
    n
}
