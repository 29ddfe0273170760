use chrono::NaiveDate;

/// Bucket the absolute day difference between `date` and `now` into a coarse
/// label. Week, month, and year counts floor their divisions (a month is
/// approximated as 30 days, not calendar-aware) and the unit never inflects,
/// so a 7-day-old entry reads "1 weeks ago".
pub fn format_relative_age(date: NaiveDate, now: NaiveDate) -> String {
    let days = (now - date).num_days().abs();

    match days {
        1 => "1 day ago".to_string(),
        d if d < 7 => format!("{} days ago", d),
        d if d < 30 => format!("{} weeks ago", d / 7),
        d if d < 365 => format!("{} months ago", d / 30),
        d => format!("{} years ago", d / 365),
    }
}

/// Headline form used by the entry list: calendar-aware for the two most
/// recent days, a long date otherwise.
pub fn format_entry_date(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if today.pred_opt() == Some(date) {
        "Yesterday".to_string()
    } else {
        date.format("%A, %B %d, %Y").to_string()
    }
}
