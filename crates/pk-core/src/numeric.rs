use crate::PkError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PkError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PkError::NonFinite { what, value: v })
    }
}

/// Round to a fixed number of decimal digits (half away from zero).
pub fn round_to_decimals(v: Real, decimals: u32) -> Real {
    let scale = 10f64.powi(decimals as i32);
    (v * scale).round() / scale
}

/// Neumaier compensated accumulator.
///
/// Terms are added in call order; the running compensation keeps the low-order
/// bits that a plain `+=` drops when terms of very different magnitude meet.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompensatedSum {
    sum: Real,
    compensation: Real,
}

impl CompensatedSum {
    pub const fn new() -> Self {
        Self {
            sum: 0.0,
            compensation: 0.0,
        }
    }

    pub fn add(&mut self, term: Real) {
        let t = self.sum + term;
        if self.sum.abs() >= term.abs() {
            self.compensation += (self.sum - t) + term;
        } else {
            self.compensation += (term - t) + self.sum;
        }
        self.sum = t;
    }

    pub fn total(&self) -> Real {
        self.sum + self.compensation
    }
}

impl FromIterator<Real> for CompensatedSum {
    fn from_iter<I: IntoIterator<Item = Real>>(iter: I) -> Self {
        let mut acc = CompensatedSum::new();
        for term in iter {
            acc.add(term);
        }
        acc
    }
}

/// Compensated sum of an ordered sequence.
pub fn compensated_sum<I: IntoIterator<Item = Real>>(terms: I) -> Real {
    terms.into_iter().collect::<CompensatedSum>().total()
}
