/// Distance-based team-size fit. Inside `[min, max]` (nulls act as
/// -infinity/+infinity) scores 1.0; otherwise decays by 0.3 per unit of
/// distance from the nearer bound, floored at 0.
pub fn team_fit(team_size: u32, min: Option<u32>, max: Option<u32>) -> f64 {
    let team_size = team_size as i64;
    let min = min.map(|n| n as i64).unwrap_or(i64::MIN);
    let max = max.map(|n| n as i64).unwrap_or(i64::MAX);

    let distance = if team_size < min {
        min - team_size
    } else if team_size > max {
        team_size - max
    } else {
        return 1.0;
    };

    (1.0 - 0.3 * distance as f64).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_range_is_perfect_fit() {
        assert_eq!(team_fit(2, Some(1), Some(5)), 1.0);
    }

    #[test]
    fn above_max_decays_by_distance() {
        assert!((team_fit(6, Some(1), Some(5)) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn below_min_decays_by_distance() {
        assert!((team_fit(1, Some(3), Some(5)) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn unbounded_range_always_fits() {
        assert_eq!(team_fit(500, None, None), 1.0);
    }

    #[test]
    fn far_outside_range_floors_at_zero() {
        assert_eq!(team_fit(100, Some(1), Some(5)), 0.0);
    }
}
