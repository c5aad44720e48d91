/// A closed span `[min, max]` of the real line. Spans with `min > max`
/// hold nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// `[0, 1]`, the range of a color channel or a blend factor.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True when `value` lies inside, endpoints included.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Pin `value` to the nearest endpoint when it falls outside.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// The span shared by both, possibly empty.
    pub fn overlap(&self, other: &Interval) -> Interval {
        Interval::new(self.min.max(other.min), self.max.min(other.max))
    }

    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains_endpoints() {
        let span = Interval::new(-1.0, 3.0);
        assert!(span.contains(-1.0));
        assert!(span.contains(3.0));
        assert!(span.contains(0.25));
        assert!(!span.contains(-1.5));
        assert!(!span.contains(3.001));
    }

    #[test]
    fn test_interval_clamp_to_unit() {
        assert_eq!(Interval::UNIT.clamp(-2.0), 0.0);
        assert_eq!(Interval::UNIT.clamp(0.75), 0.75);
        assert_eq!(Interval::UNIT.clamp(4.0), 1.0);
    }

    #[test]
    fn test_interval_overlap() {
        let shared = Interval::new(0.0, 4.0).overlap(&Interval::new(2.0, 9.0));
        assert_eq!(shared, Interval::new(2.0, 4.0));
        assert!(!shared.is_empty());

        let apart = Interval::new(0.0, 1.0).overlap(&Interval::new(2.0, 3.0));
        assert!(apart.is_empty());
        assert!(!apart.contains(1.5));
    }
}
