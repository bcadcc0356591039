//! Hours split and gross pay.
//!
//! Overtime is counted per Monday-aligned week: hours up to the weekly
//! threshold are regular, anything beyond is overtime. A pay period longer
//! than a week therefore cannot average out a heavy week against a light one.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::models::Timesheet;

use super::round_currency;

/// Regular and overtime hours for a worker in a pay period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoursSplit {
    /// Hours paid at the regular rate.
    pub regular_hours: Decimal,
    /// Hours paid at the overtime rate.
    pub overtime_hours: Decimal,
}

impl HoursSplit {
    /// Regular plus overtime hours.
    pub fn total(&self) -> Decimal {
        self.regular_hours + self.overtime_hours
    }
}

/// Gross pay broken down by rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrossPay {
    /// Regular hours × wage.
    pub regular_pay: Decimal,
    /// Overtime hours × wage × multiplier.
    pub overtime_pay: Decimal,
    /// Regular plus overtime pay.
    pub gross_pay: Decimal,
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Splits logged hours into regular and overtime hours.
///
/// # Arguments
///
/// * `timesheets` - The timesheets to pay; callers pass only payable ones
/// * `weekly_threshold` - Hours per week paid at the regular rate
///
/// # Example
///
/// ```
/// use payroll_batch::calculation::split_weekly_hours;
/// use payroll_batch::models::{Timesheet, TimesheetStatus};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let timesheets: Vec<Timesheet> = (6..=10)
///     .map(|day| Timesheet {
///         id: format!("ts-{day}"),
///         worker_id: "W1".to_string(),
///         work_date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
///         hours_worked: Decimal::from(9),
///         status: TimesheetStatus::Approved,
///         payroll_id: None,
///     })
///     .collect();
///
/// let split = split_weekly_hours(&timesheets, Decimal::from(40));
/// assert_eq!(split.regular_hours, Decimal::from(40));
/// assert_eq!(split.overtime_hours, Decimal::from(5));
/// ```
pub fn split_weekly_hours(timesheets: &[Timesheet], weekly_threshold: Decimal) -> HoursSplit {
    let mut weeks: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for timesheet in timesheets {
        *weeks.entry(week_start(timesheet.work_date)).or_default() += timesheet.hours_worked;
    }

    weeks
        .values()
        .fold(HoursSplit::default(), |mut split, &hours| {
            if hours > weekly_threshold {
                split.regular_hours += weekly_threshold;
                split.overtime_hours += hours - weekly_threshold;
            } else {
                split.regular_hours += hours;
            }
            split
        })
}

/// Calculates gross pay for a split of hours.
///
/// `gross = regular × wage + overtime × wage × multiplier`, each part
/// rounded to cents.
///
/// # Example
///
/// ```
/// use payroll_batch::calculation::{HoursSplit, calculate_gross_pay};
/// use rust_decimal::Decimal;
///
/// let split = HoursSplit {
///     regular_hours: Decimal::from(40),
///     overtime_hours: Decimal::from(5),
/// };
/// let gross = calculate_gross_pay(&split, Decimal::from(20), Decimal::new(15, 1));
/// assert_eq!(gross.regular_pay, Decimal::from(800));
/// assert_eq!(gross.overtime_pay, Decimal::from(150));
/// assert_eq!(gross.gross_pay, Decimal::from(950));
/// ```
pub fn calculate_gross_pay(split: &HoursSplit, hourly_wage: Decimal, multiplier: Decimal) -> GrossPay {
    let regular_pay = round_currency(split.regular_hours * hourly_wage);
    let overtime_pay = round_currency(split.overtime_hours * hourly_wage * multiplier);
    GrossPay {
        regular_pay,
        overtime_pay,
        gross_pay: regular_pay + overtime_pay,
    }
}
