use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Spending category
///
/// Serialized with the unaccented lowercase names used in the data file
/// (`alimentacao`, `saude`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Alimentacao,
    Transporte,
    Saude,
    Educacao,
    Lazer,
    Moradia,
    Vestuario,
    Outros,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Alimentacao,
        Category::Transporte,
        Category::Saude,
        Category::Educacao,
        Category::Lazer,
        Category::Moradia,
        Category::Vestuario,
        Category::Outros,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Alimentacao => "alimentacao",
            Category::Transporte => "transporte",
            Category::Saude => "saude",
            Category::Educacao => "educacao",
            Category::Lazer => "lazer",
            Category::Moradia => "moradia",
            Category::Vestuario => "vestuario",
            Category::Outros => "outros",
        }
    }

    /// Display name shown to users
    pub fn label(self) -> &'static str {
        match self {
            Category::Alimentacao => "Alimentação",
            Category::Transporte => "Transporte",
            Category::Saude => "Saúde",
            Category::Educacao => "Educação",
            Category::Lazer => "Lazer",
            Category::Moradia => "Moradia",
            Category::Vestuario => "Vestuário",
            Category::Outros => "Outros",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts the stored name or the accented label, in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted || c.label().to_lowercase() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[serde(alias = "cartao")]
    Credito,
    Debito,
    Pix,
    Dinheiro,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Credito => "Cartão de Crédito",
            PaymentMethod::Debito => "Cartão de Débito",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Dinheiro => "Dinheiro",
        }
    }
}

/// A user, identified by phone number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct User {
    pub id: u64,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(rename = "data_criacao")]
    pub created_at: DateTime<Utc>,
    /// General monthly limit, 0 when unset
    #[serde(rename = "limite_mensal_geral")]
    pub monthly_limit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Expense {
    pub id: u64,
    #[serde(rename = "usuario_id")]
    pub user_id: u64,
    #[serde(rename = "data")]
    pub date: DateTime<Utc>,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "valor")]
    pub amount: f64,
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "forma_pagamento")]
    pub payment_method: PaymentMethod,
}

/// Expense fields supplied by the caller; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub user_id: u64,
    pub date: DateTime<Utc>,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CategoryLimit {
    pub id: u64,
    #[serde(rename = "usuario_id")]
    pub user_id: u64,
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "valor_limite_mensal")]
    pub monthly_limit: f64,
}

/// Calendar month in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(Utc::now())
    }

    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        at.year() == self.year && at.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// HTTP request / response bodies
// ---------------------------------------------------------------------------

/// Incoming chat message posted by the WhatsApp integration
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct WhatsAppMessage {
    /// Sender phone number
    pub from: Option<String>,
    pub text: Option<String>,
    pub timestamp: Option<i64>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct WebhookResponse {
    pub success: bool,
    pub message: String,
    pub data: WebhookData,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct WebhookData {
    pub command: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Query string of the webhook subscription handshake
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct DailySummaryRequest {
    pub telefone: Option<String>,
    /// Generate summaries for every known user
    pub todos: Option<bool>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PhoneQuery {
    pub telefone: Option<String>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DailySummary {
    pub telefone: String,
    pub resumo: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DailySummaryResponse {
    pub success: bool,
    pub message: String,
    pub data: DailySummary,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct AllSummariesResponse {
    pub success: bool,
    pub message: String,
    pub data: Vec<DailySummary>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExpensesQuery {
    pub telefone: Option<String>,
    /// Maximum number of expenses to return (default 50)
    pub limit: Option<usize>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExpensesResponse {
    pub success: bool,
    pub data: Vec<Expense>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserSummary {
    pub id: u64,
    pub telefone: String,
    pub limite_mensal_geral: f64,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MonthTotals {
    pub total_mes: f64,
    pub por_categoria: BTreeMap<Category, f64>,
    pub por_forma_pagamento: BTreeMap<PaymentMethod, f64>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DashboardSummary {
    pub usuario: UserSummary,
    pub resumo: MonthTotals,
    pub limites_categoria: Vec<CategoryLimit>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DashboardSummaryResponse {
    pub success: bool,
    pub data: DashboardSummary,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct GeneralLimitRequest {
    pub telefone: Option<String>,
    pub limite_mensal_geral: Option<f64>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct GeneralLimitData {
    pub usuario_id: u64,
    pub limite_mensal_geral: f64,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct GeneralLimitResponse {
    pub success: bool,
    pub message: String,
    pub data: GeneralLimitData,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CategoryLimitRequest {
    pub telefone: Option<String>,
    pub categoria: Option<String>,
    pub valor_limite: Option<f64>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct CategoryLimitResponse {
    pub success: bool,
    pub message: String,
    pub data: CategoryLimit,
}
