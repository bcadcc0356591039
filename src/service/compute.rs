//! Turning a worker snapshot into estimates, previews and paystubs.

use chrono::Duration;
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use crate::calculation::{
    GrossPay, HoursSplit, PayrollCalculation, PayrollInput, calculate_gross_pay, calculate_payroll,
    round_currency, split_weekly_hours,
};
use crate::config::PayrollConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::ledger::WorkerSnapshot;
use crate::models::{
    CandidateStatus, PayPeriod, PaystubRecord, PayrollPreview, TaxProfile, WorkerPayrollCandidate,
};

/// Hours and gross pay of a snapshot at a known wage.
fn gross_for(snapshot: &WorkerSnapshot, wage: Decimal, config: &PayrollConfig) -> (HoursSplit, GrossPay) {
    let overtime = &config.settings().overtime;
    let split = split_weekly_hours(&snapshot.timesheets, overtime.weekly_threshold_hours);
    let gross = calculate_gross_pay(&split, wage, overtime.multiplier);
    (split, gross)
}

struct Computation<'a> {
    wage: Decimal,
    profile: &'a TaxProfile,
    split: HoursSplit,
    gross: GrossPay,
    payroll: PayrollCalculation,
}

/// Runs the full engine, requiring payable hours, a wage and a tax profile
/// in that order.
fn compute<'a>(
    snapshot: &'a WorkerSnapshot,
    period: &PayPeriod,
    config: &PayrollConfig,
) -> PayrollResult<Computation<'a>> {
    let worker = &snapshot.worker;
    if snapshot.timesheets.is_empty() {
        return Err(PayrollError::NoApprovedTimesheets {
            worker_id: worker.id.clone(),
            start: period.start,
            end: period.end,
        });
    }
    let wage = worker.hourly_wage.ok_or_else(|| PayrollError::MissingHourlyWage {
        worker_id: worker.id.clone(),
    })?;
    let profile = worker
        .tax_profile
        .as_ref()
        .ok_or_else(|| PayrollError::MissingTaxProfile {
            worker_id: worker.id.clone(),
        })?;

    let (split, gross) = gross_for(snapshot, wage, config);
    let input = PayrollInput {
        gross_pay: gross.gross_pay,
        profile,
        orders: &worker.garnishment_orders,
        period: *period,
        year_to_date_gross: snapshot.year_to_date_gross,
    };
    let payroll = calculate_payroll(&input, config)?;

    Ok(Computation {
        wage,
        profile,
        split,
        gross,
        payroll,
    })
}

/// Builds the eligibility candidate for a snapshot.
///
/// Without a wage every money field is zero. Without a tax profile the
/// deductions are the configured fallback share of gross.
pub fn estimate_candidate(
    snapshot: &WorkerSnapshot,
    period: &PayPeriod,
    config: &PayrollConfig,
) -> WorkerPayrollCandidate {
    let worker = &snapshot.worker;
    let threshold = config.settings().overtime.weekly_threshold_hours;
    let split = split_weekly_hours(&snapshot.timesheets, threshold);

    let zero = round_currency(Decimal::ZERO);
    let (gross_pay, estimated_deductions) = match worker.hourly_wage {
        None => (zero, zero),
        Some(wage) => match compute(snapshot, period, config) {
            Ok(computation) => (
                computation.gross.gross_pay,
                computation.payroll.total_deductions,
            ),
            Err(err) => {
                if !matches!(err, PayrollError::MissingTaxProfile { .. }) {
                    warn!(worker_id = %worker.id, error = %err, "Falling back to flat deduction estimate");
                }
                let (_, gross) = gross_for(snapshot, wage, config);
                let rate = config.settings().estimates.fallback_deduction_rate;
                (gross.gross_pay, round_currency(gross.gross_pay * rate))
            }
        },
    };

    WorkerPayrollCandidate {
        worker_id: worker.id.clone(),
        worker_name: worker.name.clone(),
        hourly_wage: worker.hourly_wage,
        regular_hours: split.regular_hours,
        overtime_hours: split.overtime_hours,
        gross_pay,
        estimated_deductions,
        estimated_net_pay: round_currency((gross_pay - estimated_deductions).max(Decimal::ZERO)),
        status: CandidateStatus::Ready,
    }
}

/// Computes what a run would pay without committing anything.
pub fn build_preview(
    snapshot: &WorkerSnapshot,
    period: &PayPeriod,
    config: &PayrollConfig,
) -> PayrollResult<PayrollPreview> {
    let c = compute(snapshot, period, config)?;
    let fica = c.payroll.fica;
    Ok(PayrollPreview {
        worker_id: snapshot.worker.id.clone(),
        worker_name: snapshot.worker.name.clone(),
        regular_hours: c.split.regular_hours,
        overtime_hours: c.split.overtime_hours,
        hourly_rate: c.wage,
        gross_pay: c.gross.gross_pay,
        federal_tax: c.payroll.federal.withholding,
        state_tax: c.payroll.state_tax,
        social_security_tax: fica.social_security,
        medicare_tax: round_currency(fica.medicare + fica.additional_medicare),
        local_tax: c.payroll.local_tax,
        garnishments: c.payroll.garnishments.total,
        net_pay: c.payroll.net_pay,
        year_to_date_gross: round_currency(snapshot.year_to_date_gross + c.gross.gross_pay),
    })
}

/// Materializes the paystub of a run. The hallmark is filled in later.
pub fn build_paystub(
    snapshot: &WorkerSnapshot,
    period: &PayPeriod,
    config: &PayrollConfig,
) -> PayrollResult<PaystubRecord> {
    let c = compute(snapshot, period, config)?;
    let payroll = &c.payroll;

    Ok(PaystubRecord {
        id: Uuid::new_v4(),
        employee_id: snapshot.worker.id.clone(),
        worker_name: snapshot.worker.name.clone(),
        pay_period_start: period.start,
        pay_period_end: period.end,
        pay_date: period.end + Duration::days(config.settings().pay_date_offset_days),
        regular_hours: c.split.regular_hours,
        overtime_hours: c.split.overtime_hours,
        total_hours: c.split.total(),
        hourly_rate: c.wage,
        regular_pay: c.gross.regular_pay,
        overtime_pay: c.gross.overtime_pay,
        gross_pay: c.gross.gross_pay,
        federal_income_tax: payroll.federal.withholding,
        social_security_tax: payroll.fica.social_security,
        medicare_tax: payroll.fica.medicare,
        additional_medicare_tax: payroll.fica.additional_medicare,
        state_tax: payroll.state_tax,
        local_tax: payroll.local_tax,
        total_mandatory_deductions: payroll.total_mandatory,
        disposable_earnings: payroll.disposable_earnings,
        garnishments: payroll.garnishments.lines.clone(),
        total_garnishments: payroll.garnishments.total,
        total_deductions: payroll.total_deductions,
        net_pay: payroll.net_pay,
        year_to_date_gross: round_currency(snapshot.year_to_date_gross + c.gross.gross_pay),
        ccpa_compliant: payroll.garnishments.ccpa_compliant,
        hallmark_asset_number: None,
        work_state: c.profile.work_state.trim().to_ascii_uppercase(),
        work_city: c.profile.work_city.clone(),
    })
}
