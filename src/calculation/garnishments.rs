//! Garnishment withholding under CCPA limits.
//!
//! Orders are withheld in priority order (lower first, ties keep their
//! original order). Each order is capped three ways:
//!
//! - by the disposable earnings still left after earlier orders;
//! - for support orders, so that everything withheld stays within the
//!   support percentage of disposable earnings;
//! - for every other order, so that everything withheld stays within the
//!   ordinary limit: the lesser of the ordinary percentage of disposable
//!   earnings and the amount by which disposable earnings exceed the
//!   protected floor. Below the floor nothing is withheld.
//!
//! The protected floor is weekly; it is scaled to the length of the period.

use rust_decimal::Decimal;

use crate::config::GarnishmentLimits;
use crate::models::{GarnishmentKind, GarnishmentLine, GarnishmentOrder, PayPeriod};

use super::round_currency;

/// Garnishments withheld for one pay period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GarnishmentResult {
    /// Lines in withholding order; orders that withheld nothing are omitted.
    pub lines: Vec<GarnishmentLine>,
    /// Sum of all lines.
    pub total: Decimal,
    /// Whether the total respects the applicable CCPA limit.
    pub ccpa_compliant: bool,
}

fn protected_floor(limits: &GarnishmentLimits, period: &PayPeriod) -> Decimal {
    limits.weekly_disposable_floor * Decimal::from(period.length_days()) / Decimal::from(7)
}

/// Ceiling on everything withheld when the order is not a support order.
fn ordinary_limit(disposable: Decimal, limits: &GarnishmentLimits, period: &PayPeriod) -> Decimal {
    let floor = protected_floor(limits, period);
    if disposable <= floor {
        return Decimal::ZERO;
    }
    (disposable * limits.max_ordinary_percentage).min(disposable - floor)
}

fn requested_amount(order: &GarnishmentOrder, disposable: Decimal) -> Decimal {
    match (order.amount_fixed, order.amount_percentage) {
        (Some(fixed), _) => fixed,
        (None, Some(percentage)) => disposable * percentage / Decimal::from(100),
        (None, None) => Decimal::ZERO,
    }
}

/// Calculates the garnishments to withhold from `disposable` earnings.
///
/// Orders that are not active during `period` are skipped.
pub fn calculate_garnishments(
    disposable: Decimal,
    orders: &[GarnishmentOrder],
    period: &PayPeriod,
    limits: &GarnishmentLimits,
) -> GarnishmentResult {
    let mut applicable: Vec<&GarnishmentOrder> =
        orders.iter().filter(|order| order.applies_to(period)).collect();
    applicable.sort_by_key(|order| order.effective_priority());

    let support_limit = disposable * limits.max_support_percentage;
    let ordinary_limit = ordinary_limit(disposable, limits, period);

    let mut lines = Vec::new();
    let mut withheld = Decimal::ZERO;

    for order in applicable {
        let remaining = disposable - withheld;
        if remaining <= Decimal::ZERO {
            break;
        }

        let limit = match order.kind {
            GarnishmentKind::ChildSupport => support_limit,
            _ => ordinary_limit,
        };
        let headroom = (limit - withheld).max(Decimal::ZERO);
        let amount = round_currency(
            requested_amount(order, disposable)
                .min(remaining)
                .min(headroom)
                .max(Decimal::ZERO),
        );
        if amount <= Decimal::ZERO {
            continue;
        }

        withheld += amount;
        lines.push(GarnishmentLine {
            order_id: order.id.clone(),
            kind: order.kind,
            amount,
            percentage: if order.amount_fixed.is_none() {
                order.amount_percentage
            } else {
                None
            },
            priority: order.effective_priority(),
        });
    }

    let ccpa_compliant = is_ccpa_compliant(disposable, &lines, limits);
    GarnishmentResult {
        total: round_currency(withheld),
        lines,
        ccpa_compliant,
    }
}

/// Checks that the total withheld stays within the share of disposable
/// earnings allowed for the kinds of orders present.
pub fn is_ccpa_compliant(
    disposable: Decimal,
    lines: &[GarnishmentLine],
    limits: &GarnishmentLimits,
) -> bool {
    let total: Decimal = lines.iter().map(|line| line.amount).sum();
    if disposable <= Decimal::ZERO {
        return total <= Decimal::ZERO;
    }

    let has_support = lines
        .iter()
        .any(|line| line.kind == GarnishmentKind::ChildSupport);
    let max_share = if has_support {
        limits.max_support_percentage
    } else {
        limits.max_ordinary_percentage
    };
    // a cent of slack for per-line rounding
    total <= round_currency(disposable * max_share) + Decimal::new(1, 2)
}
