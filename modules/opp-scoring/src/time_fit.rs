use chrono::{DateTime, Utc};

/// Piecewise time-fit curve on days until the application deadline. No
/// deadline at all scores 0.7 — neither urgent nor stale.
pub fn time_fit(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(deadline) = deadline else {
        return 0.7;
    };
    let days = (deadline - now).num_seconds() as f64 / 86_400.0;

    if days < 0.0 {
        0.0
    } else if days <= 3.0 {
        0.3
    } else if days <= 7.0 {
        0.7
    } else if days <= 14.0 {
        1.0
    } else if days <= 30.0 {
        0.9
    } else if days <= 60.0 {
        0.7
    } else if days <= 90.0 {
        0.5
    } else {
        0.3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn no_deadline_is_neutral() {
        assert_eq!(time_fit(None, Utc::now()), 0.7);
    }

    #[test]
    fn boundary_days_match_the_published_curve() {
        let now = Utc::now();
        let cases = [
            (-1, 0.0),
            (0, 0.3),
            (3, 0.3),
            (7, 0.7),
            (14, 1.0),
            (30, 0.9),
            (60, 0.7),
            (90, 0.5),
            (120, 0.3),
        ];
        for (d, expected) in cases {
            let deadline = now + Duration::days(d);
            assert_eq!(time_fit(Some(deadline), now), expected, "d={d}");
        }
    }
}
