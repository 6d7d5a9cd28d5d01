use chrono::NaiveDate;

pub const WEEKS_IN_CYCLE: i64 = 4;

/// Which of the four rotation weeks `today` falls in, counting from `cycle_start`.
///
/// Uses floor division, so dates before `cycle_start` still land in `1..=4`:
/// the day before the anchor is the last day of week 4.
pub fn compute_week_index(cycle_start: NaiveDate, today: NaiveDate) -> u8 {
    let elapsed_days = (today - cycle_start).num_days();
    let week = elapsed_days.div_euclid(7).rem_euclid(WEEKS_IN_CYCLE) + 1;
    week as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_anchor_scenarios() {
        let start = date(2025, 11, 24);
        assert_eq!(compute_week_index(start, date(2025, 11, 24)), 1);
        assert_eq!(compute_week_index(start, date(2025, 11, 30)), 1);
        assert_eq!(compute_week_index(start, date(2025, 12, 1)), 2);
        assert_eq!(compute_week_index(start, date(2025, 12, 8)), 3);
        assert_eq!(compute_week_index(start, date(2025, 12, 15)), 4);
        assert_eq!(compute_week_index(start, date(2025, 12, 22)), 1);
    }

    #[test]
    fn test_before_cycle_start_uses_floor_mod() {
        let start = date(2025, 11, 24);
        assert_eq!(compute_week_index(start, date(2025, 11, 23)), 4);
        assert_eq!(compute_week_index(start, date(2025, 11, 17)), 4);
        assert_eq!(compute_week_index(start, date(2025, 11, 16)), 3);
        assert_eq!(compute_week_index(start, date(2025, 10, 27)), 1);
    }

    #[test]
    fn test_periodic_and_bounded() {
        let start = date(2025, 11, 24);
        let mut day = date(2024, 1, 1);
        while day < date(2027, 1, 1) {
            let week = compute_week_index(start, day);
            assert!((1..=4).contains(&week), "{day} gave {week}");
            assert_eq!(week, compute_week_index(start, day + Duration::days(28)));
            day += Duration::days(1);
        }
    }
}
