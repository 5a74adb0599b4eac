use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::errors::{LoanError, Result};
use crate::types::RepaymentFrequency;

/// map `target` to the billing day of its own month
///
/// Months shorter than the billing day clamp to their last day, so a loan
/// billed on the 31st pays on Feb 28 (or 29) and Apr 30 without ever spilling
/// into the next month.
pub fn normalize(target: NaiveDate, billing_day: u32) -> Result<NaiveDate> {
    if !(1..=31).contains(&billing_day) {
        return Err(LoanError::invalid_input(format!(
            "billing day {} is outside 1..=31",
            billing_day
        )));
    }

    let last = last_day_of_month(target);
    if billing_day > last.day() {
        return Ok(last);
    }

    Ok(first_day_of_month(target) + Duration::days(i64::from(billing_day) - 1))
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let days = days_in_month(date.year(), date.month());
    first_day_of_month(date) + Duration::days(i64::from(days) - 1)
}

/// step `months` calendar months forward, clamping to the target month's end
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months)).ok_or_else(|| {
        LoanError::invalid_input(format!("{} + {} months is out of range", date, months))
    })
}

/// due date of every installment, 1..=periods, after `posting_date`
///
/// Month-aligned frequencies land on `billing_day`; day-aligned ones simply
/// step by their period length and ignore it.
pub fn repayment_dates(
    posting_date: NaiveDate,
    periods: u32,
    billing_day: u32,
    frequency: RepaymentFrequency,
) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::new();

    for i in 1..=periods {
        let out_of_range =
            || LoanError::invalid_input(format!("installment {} is out of range", i));

        let date = match frequency.months_per_period() {
            Some(step) => {
                let months = step.checked_mul(i).ok_or_else(out_of_range)?;
                normalize(add_months(posting_date, months)?, billing_day)?
            }
            None => {
                let step = frequency.days_per_period().unwrap_or(1);
                posting_date
                    .checked_add_signed(Duration::days(i64::from(step) * i64::from(i)))
                    .ok_or_else(out_of_range)?
            }
        };
        dates.push(date);
    }

    Ok(dates)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
