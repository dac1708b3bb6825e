//! Computes the next occurrence date for recurring transactions.
//!
//! The list view never does this arithmetic; it only displays the stored
//! date. The create and edit endpoints call into here when a transaction is
//! saved with a repeat schedule.

use time::{Date, Duration, Month, util::days_in_month};

use super::core::RecurringInterval;

/// The date a recurring transaction next repeats, one interval after `date`.
///
/// Month steps clamp the day to the length of the target month (Jan 31 →
/// Feb 28), and year steps clamp Feb 29 on non-leap years.
pub fn next_occurrence(date: Date, interval: RecurringInterval) -> Date {
    match interval {
        RecurringInterval::Daily => date + Duration::days(1),
        RecurringInterval::Weekly => date + Duration::days(7),
        RecurringInterval::Monthly => add_months(date, 1),
        RecurringInterval::Yearly => add_years(date, 1),
    }
}

fn add_months(date: Date, months: u8) -> Date {
    let mut month = date.month();
    let mut year = date.year();

    for _ in 0..months {
        month = month.next();
        if month == Month::January {
            year += 1;
        }
    }

    let day = date.day().min(days_in_month(month, year));

    Date::from_calendar_date(year, month, day).expect("day is clamped to the month length")
}

fn add_years(date: Date, years: i32) -> Date {
    let year = date.year() + years;
    let day = date.day().min(days_in_month(date.month(), year));

    Date::from_calendar_date(year, date.month(), day).expect("day is clamped to the month length")
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::transaction::RecurringInterval;

    use super::next_occurrence;

    #[test]
    fn daily_advances_one_day() {
        let got = next_occurrence(date!(2025 - 10 - 05), RecurringInterval::Daily);

        assert_eq!(got, date!(2025 - 10 - 06));
    }

    #[test]
    fn daily_rolls_over_month_boundary() {
        let got = next_occurrence(date!(2025 - 01 - 31), RecurringInterval::Daily);

        assert_eq!(got, date!(2025 - 02 - 01));
    }

    #[test]
    fn weekly_advances_seven_days() {
        let got = next_occurrence(date!(2025 - 12 - 29), RecurringInterval::Weekly);

        assert_eq!(got, date!(2026 - 01 - 05));
    }

    #[test]
    fn monthly_keeps_day_of_month() {
        let got = next_occurrence(date!(2025 - 03 - 15), RecurringInterval::Monthly);

        assert_eq!(got, date!(2025 - 04 - 15));
    }

    #[test]
    fn monthly_clamps_to_shorter_month() {
        let got = next_occurrence(date!(2025 - 01 - 31), RecurringInterval::Monthly);

        assert_eq!(got, date!(2025 - 02 - 28));
    }

    #[test]
    fn monthly_rolls_over_year_boundary() {
        let got = next_occurrence(date!(2025 - 12 - 31), RecurringInterval::Monthly);

        assert_eq!(got, date!(2026 - 01 - 31));
    }

    #[test]
    fn yearly_advances_one_year() {
        let got = next_occurrence(date!(2025 - 07 - 04), RecurringInterval::Yearly);

        assert_eq!(got, date!(2026 - 07 - 04));
    }

    #[test]
    fn yearly_clamps_leap_day() {
        let got = next_occurrence(date!(2024 - 02 - 29), RecurringInterval::Yearly);

        assert_eq!(got, date!(2025 - 02 - 28));
    }
}
