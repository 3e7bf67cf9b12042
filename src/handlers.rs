use crate::errors::AppError;
use crate::models::{
    MemberListResponse, Payment, PaymentListResponse, PresetOption, RecordPaymentRequest,
    RevenueReport,
};
use crate::range::{DateRange, PRESETS, RangeFilter, RangePreset, parse_instant, resolve_preset};
use crate::reports::{build_revenue_report, matches_range, range_echo};
use crate::state::AppState;
use crate::storage::persist_data;
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::Deserialize;

/// Range filter as the dashboard sends it. An explicit `dateFrom`/`dateTo`
/// pair takes precedence over a preset tag.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub preset: Option<String>,
    #[serde(rename = "dateFrom")]
    pub date_from: Option<String>,
    #[serde(rename = "dateTo")]
    pub date_to: Option<String>,
}

fn resolve_filter(query: &RangeQuery) -> Result<RangeFilter, AppError> {
    match (query.date_from.as_deref(), query.date_to.as_deref()) {
        (Some(from), Some(to)) => RangeFilter::custom(from, to)
            .ok_or_else(|| AppError::bad_request("dateFrom and dateTo must be valid dates with dateFrom <= dateTo")),
        (Some(_), None) | (None, Some(_)) => Err(AppError::bad_request(
            "dateFrom and dateTo must be provided together",
        )),
        (None, None) => Ok(query
            .preset
            .as_deref()
            .map_or(RangeFilter::Unbounded, |tag| {
                RangeFilter::Preset(RangePreset::parse(tag))
            })),
    }
}

pub async fn get_revenue_report(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<RevenueReport>, AppError> {
    let range = resolve_filter(&query)?.resolve(Utc::now());
    let data = state.data.lock().await;
    Ok(Json(build_revenue_report(range.as_ref(), &data)))
}

pub async fn list_presets() -> Json<Vec<PresetOption>> {
    let now = Utc::now();
    let options = PRESETS
        .iter()
        .map(|&preset| {
            let range = resolve_preset(preset, now);
            PresetOption {
                preset: preset.as_str(),
                label: preset.label(),
                date_from: range.as_ref().map(DateRange::date_from_iso),
                date_to: range.as_ref().map(DateRange::date_to_iso),
            }
        })
        .collect();
    Json(options)
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<PaymentListResponse>, AppError> {
    let range = resolve_filter(&query)?.resolve(Utc::now());
    let data = state.data.lock().await;
    let payments: Vec<Payment> = data
        .payments
        .iter()
        .filter(|payment| matches_range(payment.paid_at.as_deref(), range.as_ref()))
        .cloned()
        .collect();
    let total_amount = payments.iter().map(|payment| payment.amount).sum();

    Ok(Json(PaymentListResponse {
        range: range_echo(range.as_ref()),
        count: payments.len() as u64,
        total_amount,
        payments,
    }))
}

pub async fn list_members(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<MemberListResponse>, AppError> {
    let range = resolve_filter(&query)?.resolve(Utc::now());
    let data = state.data.lock().await;
    let members: Vec<_> = data
        .members
        .iter()
        .filter(|member| matches_range(member.joined_at.as_deref(), range.as_ref()))
        .cloned()
        .collect();

    Ok(Json(MemberListResponse {
        range: range_echo(range.as_ref()),
        count: members.len() as u64,
        members,
    }))
}

pub async fn record_payment(
    State(state): State<AppState>,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<Json<Payment>, AppError> {
    let member_id = payload.member_id.trim();
    if member_id.is_empty() {
        return Err(AppError::bad_request("member_id must not be empty"));
    }
    if !payload.amount.is_finite() || payload.amount <= 0.0 {
        return Err(AppError::bad_request("amount must be a positive number"));
    }

    let paid_at = match payload.paid_at.as_deref() {
        Some(raw) => {
            if parse_instant(raw).is_none() {
                return Err(AppError::bad_request(
                    "paid_at must be an ISO instant or YYYY-MM-DD date",
                ));
            }
            raw.trim().to_string()
        }
        None => Utc::now().format("%Y-%m-%d").to_string(),
    };

    let method = payload.method.trim();
    let mut data = state.data.lock().await;
    let payment = Payment {
        id: format!("pay-{}-{}", Utc::now().timestamp_millis(), data.payments.len() + 1),
        member_id: member_id.to_string(),
        amount: payload.amount,
        method: if method.is_empty() { "cash".to_string() } else { method.to_string() },
        status: "completed".to_string(),
        paid_at: Some(paid_at),
    };
    data.payments.push(payment.clone());

    persist_data(&state.data_path, &data).await?;

    Ok(Json(payment))
}
