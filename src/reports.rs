use crate::models::{GymData, MonthlyRevenuePoint, RangeEcho, RevenueReport, SignupPoint};
use crate::range::{DateRange, format_range_label, is_in_range, parse_instant};
use std::collections::BTreeMap;

/// Aggregates completed payments and member signups into calendar-month
/// buckets for the revenue chart. `None` range means unbounded: every
/// record counts, dated or not; only dated records land in a bucket.
pub fn build_revenue_report(range: Option<&DateRange>, data: &GymData) -> RevenueReport {
    let mut revenue_by_month: BTreeMap<String, (f64, u64)> = BTreeMap::new();
    let mut total_revenue = 0.0;
    let mut payment_count = 0u64;

    for payment in &data.payments {
        if payment.status != "completed" {
            continue;
        }
        if !matches_range(payment.paid_at.as_deref(), range) {
            continue;
        }
        total_revenue += payment.amount;
        payment_count += 1;

        if let Some(month) = month_key(payment.paid_at.as_deref()) {
            let entry = revenue_by_month.entry(month).or_insert((0.0, 0));
            entry.0 += payment.amount;
            entry.1 += 1;
        }
    }

    let mut joins_by_month: BTreeMap<String, u64> = BTreeMap::new();
    for member in &data.members {
        if !matches_range(member.joined_at.as_deref(), range) {
            continue;
        }
        if let Some(month) = month_key(member.joined_at.as_deref()) {
            *joins_by_month.entry(month).or_insert(0) += 1;
        }
    }

    let average_payment = if payment_count == 0 {
        0.0
    } else {
        total_revenue / payment_count as f64
    };

    RevenueReport {
        range: range_echo(range),
        total_revenue,
        payment_count,
        average_payment,
        monthly_revenue: revenue_by_month
            .into_iter()
            .map(|(month, (revenue, payments))| MonthlyRevenuePoint {
                month,
                revenue,
                payments,
            })
            .collect(),
        monthly_signups: joins_by_month
            .into_iter()
            .map(|(month, joins)| SignupPoint { month, joins })
            .collect(),
    }
}

/// Range test over an optional filter: no range means every record passes,
/// including ones with missing or malformed dates.
pub fn matches_range(candidate: Option<&str>, range: Option<&DateRange>) -> bool {
    match range {
        Some(range) => is_in_range(candidate, range),
        None => true,
    }
}

pub fn range_echo(range: Option<&DateRange>) -> Option<RangeEcho> {
    range.map(|range| RangeEcho {
        date_from: range.date_from_iso(),
        date_to: range.date_to_iso(),
        label: format_range_label(range),
    })
}

fn month_key(candidate: Option<&str>) -> Option<String> {
    candidate
        .and_then(parse_instant)
        .map(|instant| instant.format("%Y-%m").to_string())
}
