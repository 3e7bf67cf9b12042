use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub member_id: String,
    pub amount: f64,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub status: String,
    /// Date the payment cleared. Externally-sourced records may lack this
    /// or carry an unparseable value; such payments never match a bounded
    /// range filter.
    #[serde(default)]
    pub paid_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub plan: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub joined_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GymData {
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub member_id: String,
    pub amount: f64,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub paid_at: Option<String>,
}

/// The resolved bounds echoed back with a filtered response, in the shape
/// the dashboard passes along as query parameters.
#[derive(Debug, Serialize)]
pub struct RangeEcho {
    #[serde(rename = "dateFrom")]
    pub date_from: String,
    #[serde(rename = "dateTo")]
    pub date_to: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct PresetOption {
    pub preset: &'static str,
    pub label: &'static str,
    #[serde(rename = "dateFrom")]
    pub date_from: Option<String>,
    #[serde(rename = "dateTo")]
    pub date_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MonthlyRevenuePoint {
    pub month: String,
    pub revenue: f64,
    pub payments: u64,
}

#[derive(Debug, Serialize)]
pub struct SignupPoint {
    pub month: String,
    pub joins: u64,
}

#[derive(Debug, Serialize)]
pub struct RevenueReport {
    /// `None` when the report is unbounded (preset `all` or no filter).
    pub range: Option<RangeEcho>,
    pub total_revenue: f64,
    pub payment_count: u64,
    pub average_payment: f64,
    pub monthly_revenue: Vec<MonthlyRevenuePoint>,
    pub monthly_signups: Vec<SignupPoint>,
}

#[derive(Debug, Serialize)]
pub struct PaymentListResponse {
    pub range: Option<RangeEcho>,
    pub count: u64,
    pub total_amount: f64,
    pub payments: Vec<Payment>,
}

#[derive(Debug, Serialize)]
pub struct MemberListResponse {
    pub range: Option<RangeEcho>,
    pub count: u64,
    pub members: Vec<Member>,
}
