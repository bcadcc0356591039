//! Property tests for pay arithmetic, garnishment limits and batch accounting.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use payroll_batch::calculation::{
    HoursSplit, calculate_garnishments, calculate_gross_pay, round_currency, split_weekly_hours,
};
use payroll_batch::config::{ConfigLoader, PayrollConfig};
use payroll_batch::ledger::{PayrollLedger, Roster};
use payroll_batch::models::{
    FilingStatus, GarnishmentKind, GarnishmentOrder, OrderStatus, PayPeriod, TaxProfile,
    Timesheet, TimesheetStatus, Worker,
};
use payroll_batch::service::PayrollService;

fn config() -> PayrollConfig {
    ConfigLoader::load("./config/us_2025")
        .expect("Failed to load config")
        .config()
        .clone()
}

fn week() -> PayPeriod {
    PayPeriod::week_containing(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap())
}

/// Hours in quarter-hour steps, 0 to 16.
fn hours_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=64).prop_map(|quarters| Decimal::new(quarters * 25, 2))
}

/// Wages in cents, $7.25 to $150.00.
fn wage_strategy() -> impl Strategy<Value = Decimal> {
    (725i64..=15_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn disposable_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=500_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn kind_strategy() -> impl Strategy<Value = GarnishmentKind> {
    prop_oneof![
        Just(GarnishmentKind::ChildSupport),
        Just(GarnishmentKind::TaxLevy),
        Just(GarnishmentKind::StudentLoan),
        Just(GarnishmentKind::Creditor),
    ]
}

fn order_strategy() -> impl Strategy<Value = GarnishmentOrder> {
    (
        kind_strategy(),
        prop::option::of((0i64..=200_000).prop_map(|c| Decimal::new(c, 2))),
        (0i64..=100).prop_map(Decimal::from),
        prop::option::of(1u32..=10),
    )
        .prop_map(|(kind, amount_fixed, percentage, priority)| GarnishmentOrder {
            id: format!("{kind:?}"),
            kind,
            amount_fixed,
            amount_percentage: Some(percentage),
            priority,
            effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            expiry_date: None,
            status: OrderStatus::Active,
        })
}

fn timesheets(hours: &[Decimal]) -> Vec<Timesheet> {
    hours
        .iter()
        .enumerate()
        .map(|(i, hours)| Timesheet {
            id: format!("ts-{i}"),
            worker_id: "W1".to_string(),
            work_date: NaiveDate::from_ymd_opt(2025, 1, 6 + (i as u32 % 7)).unwrap(),
            hours_worked: *hours,
            status: TimesheetStatus::Approved,
            payroll_id: None,
        })
        .collect()
}

proptest! {
    /// Property: a week's hours split into regular up to the threshold and the rest overtime
    #[test]
    fn weekly_split_preserves_hours(hours in prop::collection::vec(hours_strategy(), 0..7)) {
        let total: Decimal = hours.iter().sum();
        let split = split_weekly_hours(&timesheets(&hours), Decimal::from(40));

        prop_assert_eq!(split.regular_hours + split.overtime_hours, total);
        prop_assert!(split.regular_hours <= Decimal::from(40));
        if total <= Decimal::from(40) {
            prop_assert_eq!(split.overtime_hours, Decimal::ZERO);
        }
    }

    /// Property: gross is regular × wage plus overtime × wage × 1.5, to the cent
    #[test]
    fn gross_follows_the_overtime_formula(
        regular in hours_strategy(),
        overtime in hours_strategy(),
        wage in wage_strategy(),
    ) {
        let split = HoursSplit { regular_hours: regular, overtime_hours: overtime };
        let gross = calculate_gross_pay(&split, wage, Decimal::new(15, 1));

        prop_assert_eq!(gross.gross_pay, gross.regular_pay + gross.overtime_pay);
        prop_assert_eq!(gross.regular_pay, round_currency(regular * wage));
        prop_assert_eq!(gross.overtime_pay, round_currency(overtime * wage * Decimal::new(15, 1)));
        prop_assert!(gross.overtime_pay >= round_currency(overtime * wage));
    }

    /// Property: garnishments never exceed disposable earnings or the CCPA caps
    #[test]
    fn garnishments_stay_within_limits(
        disposable in disposable_strategy(),
        orders in prop::collection::vec(order_strategy(), 0..5),
    ) {
        let config = config();
        let limits = config.garnishments();
        let result = calculate_garnishments(disposable, &orders, &week(), limits);

        prop_assert!(result.total <= disposable);
        prop_assert!(result.total <= round_currency(disposable * limits.max_support_percentage) + Decimal::new(1, 2));
        prop_assert!(result.ccpa_compliant);
        prop_assert!(result.lines.iter().all(|line| line.amount > Decimal::ZERO));
        prop_assert!(result.lines.windows(2).all(|w| w[0].priority <= w[1].priority));

        let has_support = orders.iter().any(|o| o.kind == GarnishmentKind::ChildSupport);
        if !has_support {
            prop_assert!(result.total <= round_currency(disposable * limits.max_ordinary_percentage) + Decimal::new(1, 2));
        }
    }
}

fn roster(workers: usize) -> Roster {
    let mut roster = Roster::default();
    for n in 0..workers {
        let id = format!("W{n}");
        roster.workers.push(Worker {
            id: id.clone(),
            name: format!("Worker {n}"),
            hourly_wage: if n % 3 == 1 { None } else { Some(Decimal::from(20)) },
            tax_profile: Some(TaxProfile {
                filing_status: FilingStatus::Single,
                extra_withholding: Decimal::ZERO,
                work_state: "TN".to_string(),
                work_city: None,
            }),
            garnishment_orders: Vec::new(),
        });
        roster.timesheets.push(Timesheet {
            id: format!("ts-{id}"),
            worker_id: id,
            work_date: NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
            hours_worked: Decimal::from(8),
            status: TimesheetStatus::Approved,
            payroll_id: None,
        });
    }
    roster
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: every distinct submitted id is either processed or failed, exactly once
    #[test]
    fn batch_accounts_for_every_distinct_worker(
        picks in prop::collection::vec(0usize..8, 1..12),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let ids: Vec<String> = picks.iter().map(|n| format!("W{n}")).collect();
        let mut distinct = ids.clone();
        distinct.sort();
        distinct.dedup();

        let outcome = runtime.block_on(async {
            let ledger = PayrollLedger::from_roster(roster(6)).await.unwrap();
            let service = PayrollService::from_config(config(), ledger);
            service.process_batch(&ids, week()).await.unwrap()
        });

        prop_assert_eq!(outcome.total(), distinct.len());
        let mut reported: Vec<&str> = outcome
            .payrolls
            .iter()
            .map(|p| p.worker_id.as_str())
            .chain(outcome.errors.iter().map(|e| e.worker_id.as_str()))
            .collect();
        reported.sort();
        prop_assert_eq!(reported, distinct.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
