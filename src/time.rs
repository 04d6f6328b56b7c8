//! Units of simulated time. Every time in the crate is an `f64` measured in days.

pub const DAY: f64 = 1.0;
pub const HOUR: f64 = DAY / 24.0;
pub const MINUTE: f64 = DAY / (24.0 * 60.0);
pub const SECOND: f64 = DAY / (24.0 * 60.0 * 60.0);
pub const WEEK: f64 = DAY * 7.0;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn units_are_consistent() {
        assert_approx_eq!(24.0 * HOUR, DAY);
        assert_approx_eq!(60.0 * MINUTE, HOUR);
        assert_approx_eq!(60.0 * SECOND, MINUTE);
        assert_approx_eq!(7.0 * DAY, WEEK);
    }
}
