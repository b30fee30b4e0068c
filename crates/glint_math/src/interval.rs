/// A closed range of ray parameters `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Create an interval from two bounds given in either order.
    pub fn ordered(a: f64, b: f64) -> Self {
        if a > b {
            Self::new(b, a)
        } else {
            Self::new(a, b)
        }
    }

    /// Returns true if the interval contains nothing (min > max).
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// The overlap of two intervals. Empty if they are disjoint.
    pub fn intersect(&self, other: &Interval) -> Interval {
        Interval::new(self.min.max(other.min), self.max.min(other.max))
    }

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_ordered() {
        assert_eq!(Interval::ordered(3.0, -1.0), Interval::new(-1.0, 3.0));
        assert_eq!(Interval::ordered(-1.0, 3.0), Interval::new(-1.0, 3.0));
    }

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.0, 10.0);

        // Inclusive bounds
        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_intersect() {
        let a = Interval::new(1.0, 5.0);
        let b = Interval::new(3.0, 8.0);
        assert_eq!(a.intersect(&b), Interval::new(3.0, 5.0));

        let disjoint = a.intersect(&Interval::new(6.0, 7.0));
        assert!(disjoint.is_empty());
    }

    #[test]
    fn test_interval_universe() {
        assert!(Interval::UNIVERSE.contains(1e300));
        assert!(Interval::UNIVERSE.contains(-1e300));
        assert!(!Interval::UNIVERSE.is_empty());

        let unit = Interval::new(1.0, 2.0);
        assert_eq!(Interval::UNIVERSE.intersect(&unit), unit);
    }
}
