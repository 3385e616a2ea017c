use crate::domain::BillingCycle;
use time::{util::days_in_year_month, Date};

/// Next renewal after `from` for the given cycle. Day-of-month is clamped
/// when the target month is shorter, e.g. Jan 31 + 1 month = Feb 28/29.
pub fn next_renewal_date(from: Date, cycle: BillingCycle) -> Date {
    match cycle {
        BillingCycle::Monthly => add_months(from, 1),
        BillingCycle::Annual => add_years(from, 1),
    }
}

fn add_months(date: Date, months: u8) -> Date {
    let month = date.month().nth_next(months);
    let year = date.year() + (date.month() as i32 - 1 + months as i32).div_euclid(12);
    let day = date.day().min(days_in_year_month(year, month));

    Date::from_calendar_date(year, month, day).expect("clamped day is valid for the target month")
}

fn add_years(date: Date, years: i32) -> Date {
    let year = date.year() + years;
    let day = date.day().min(days_in_year_month(year, date.month()));

    Date::from_calendar_date(year, date.month(), day)
        .expect("clamped day is valid for the target month")
}
