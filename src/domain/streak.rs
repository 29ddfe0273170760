use chrono::NaiveDate;

/// Count of consecutive logged days ending at `today`, walking backward one
/// calendar day at a time until the first unlogged day. An unlogged `today`
/// yields 0: the streak breaks the moment the current day has no entry, with
/// no grace period.
///
/// The walk probes at most one day past the oldest logged entry, so it always
/// terminates within the number of stored entries plus one lookups.
pub fn compute_streak<F>(today: NaiveDate, mut has_entry: F) -> u32
where
    F: FnMut(NaiveDate) -> bool,
{
    let mut streak = 0;
    let mut day = today;

    while has_entry(day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn logged(days: &[&str]) -> BTreeSet<NaiveDate> {
        days.iter().map(|d| date(d)).collect()
    }

    #[test]
    fn empty_journal_has_no_streak() {
        let days = logged(&[]);
        assert_eq!(compute_streak(date("2024-01-05"), |d| days.contains(&d)), 0);
    }

    #[test]
    fn missing_today_breaks_the_streak_regardless_of_history() {
        let days = logged(&["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"]);
        assert_eq!(compute_streak(date("2024-01-05"), |d| days.contains(&d)), 0);
    }

    #[test]
    fn counts_exactly_the_consecutive_run_ending_today() {
        let days = logged(&["2024-01-08", "2024-01-09", "2024-01-10"]);
        assert_eq!(compute_streak(date("2024-01-10"), |d| days.contains(&d)), 3);
    }

    #[test]
    fn stops_at_the_first_gap() {
        let days = logged(&["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-05"]);

        // Gap on the 4th: as of the 5th only that single day counts.
        assert_eq!(compute_streak(date("2024-01-05"), |d| days.contains(&d)), 1);
        assert_eq!(compute_streak(date("2024-01-03"), |d| days.contains(&d)), 3);
    }

    #[test]
    fn single_day_streak() {
        let days = logged(&["2024-02-29"]);
        assert_eq!(compute_streak(date("2024-02-29"), |d| days.contains(&d)), 1);
    }
}
