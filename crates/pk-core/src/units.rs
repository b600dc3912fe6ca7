// pk-core/src/units.rs

use uom::si::f64::{Frequency as UomFrequency, Ratio as UomRatio, Time as UomTime};

// Public canonical unit types (SI, f64)
pub type Frequency = UomFrequency;
pub type Ratio = UomRatio;
pub type Time = UomTime;

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn per_s(v: f64) -> Frequency {
    use uom::si::frequency::hertz;
    Frequency::new::<hertz>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

#[inline]
pub fn seconds(t: Time) -> f64 {
    use uom::si::time::second;
    t.get::<second>()
}

#[inline]
pub fn per_second(f: Frequency) -> f64 {
    use uom::si::frequency::hertz;
    f.get::<hertz>()
}

#[inline]
pub fn fraction(r: Ratio) -> f64 {
    use uom::si::ratio::ratio;
    r.get::<ratio>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_round_trip() {
        assert_eq!(seconds(s(2.0e-5)), 2.0e-5);
    }

    #[test]
    fn decay_constant_round_trip() {
        assert_eq!(per_second(per_s(0.0127)), 0.0127);
    }

    #[test]
    fn yield_fraction_round_trip() {
        assert_eq!(fraction(unitless(0.000266)), 0.000266);
    }
}
