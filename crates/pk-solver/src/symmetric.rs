//! Elementary symmetric sums over the decay constants.
//!
//! `e_m(v)` is the sum, over every size-m subset of `v`, of the product of the
//! subset's elements. The polynomial builders use them because
//! Π_k (s + λ_k) = Σ_m e_m(λ)·s^(N−m).

use pk_core::{CompensatedSum, Real, round_to_decimals};

/// Rounding applied to each symmetric sum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SumRounding {
    /// Compensated accumulation, no rounding.
    #[default]
    Exact,
    /// Round every sum to this many decimal digits (legacy output uses 8).
    Decimals(u32),
}

impl SumRounding {
    pub fn apply(self, v: Real) -> Real {
        match self {
            SumRounding::Exact => v,
            SumRounding::Decimals(d) => round_to_decimals(v, d),
        }
    }
}

/// e_m(values). `m = 0` is the empty product 1; `m > len` is 0.
pub fn elementary_symmetric(m: usize, values: &[Real], rounding: SumRounding) -> Real {
    rounding.apply(subset_product_sum(m, values))
}

/// e_m over `values` with index `i` removed. `values` itself is left untouched.
pub fn elementary_symmetric_excluding(
    i: usize,
    m: usize,
    values: &[Real],
    rounding: SumRounding,
) -> Real {
    debug_assert!(i < values.len(), "excluded index out of range");
    let reduced: Vec<Real> = values
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .map(|(_, &v)| v)
        .collect();
    rounding.apply(subset_product_sum(m, &reduced))
}

/// Table `[e_0, e_1, ..., e_N]` for `values`.
pub fn symmetric_table(values: &[Real], rounding: SumRounding) -> Vec<Real> {
    (0..=values.len())
        .map(|m| elementary_symmetric(m, values, rounding))
        .collect()
}

/// Table `[e_0, ..., e_{N-1}]` of sums with index `i` excluded.
pub fn symmetric_table_excluding(i: usize, values: &[Real], rounding: SumRounding) -> Vec<Real> {
    (0..values.len())
        .map(|m| elementary_symmetric_excluding(i, m, values, rounding))
        .collect()
}

/// Enumerate size-m index combinations in lexicographic order and sum products.
fn subset_product_sum(m: usize, values: &[Real]) -> Real {
    let n = values.len();
    if m == 0 {
        return 1.0;
    }
    if m > n {
        return 0.0;
    }

    let mut idx: Vec<usize> = (0..m).collect();
    let mut acc = CompensatedSum::new();
    loop {
        acc.add(idx.iter().map(|&j| values[j]).product());

        // Rightmost position that can still move forward
        let Some(pos) = (0..m).rev().find(|&p| idx[p] < n - m + p) else {
            return acc.total();
        };
        idx[pos] += 1;
        for k in pos + 1..m {
            idx[k] = idx[k - 1] + 1;
        }
    }
}
