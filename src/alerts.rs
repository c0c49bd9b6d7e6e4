//! Budget threshold evaluation

use std::collections::BTreeMap;

use crate::models::{Category, CategoryLimit};

/// Share of a limit at which a warning is raised
pub const WARNING_PERCENT: f64 = 80.0;
pub const EXCEEDED_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    /// At least 80% but under 100% of the limit
    Warning,
    Exceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertScope {
    General,
    Category(Category),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LimitAlert {
    pub scope: AlertScope,
    pub level: AlertLevel,
    pub percent: f64,
    pub spent: f64,
    pub limit: f64,
}

/// Percentage of `limit` used by `spent`; `None` for a non-positive limit
pub fn percent_used(spent: f64, limit: f64) -> Option<f64> {
    (limit > 0.0).then(|| spent / limit * 100.0)
}

pub fn threshold(spent: f64, limit: f64) -> Option<AlertLevel> {
    let percent = percent_used(spent, limit)?;
    if percent >= EXCEEDED_PERCENT {
        Some(AlertLevel::Exceeded)
    } else if percent >= WARNING_PERCENT {
        Some(AlertLevel::Warning)
    } else {
        None
    }
}

/// Build an alert when `spent` has crossed 80% of `limit`
pub fn evaluate(scope: AlertScope, spent: f64, limit: f64) -> Option<LimitAlert> {
    let level = threshold(spent, limit)?;
    Some(LimitAlert {
        scope,
        level,
        percent: spent / limit * 100.0,
        spent,
        limit,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: Category,
    pub amount: f64,
    /// Share of the month's total, 0 when nothing was spent
    pub percent: f64,
}

/// Month overview used by the daily summary
#[derive(Debug, Clone, PartialEq)]
pub struct MonthStatus {
    pub total_spent: f64,
    pub general_limit: f64,
    pub percent_used: f64,
    pub remaining: f64,
    pub top_categories: Vec<CategoryShare>,
    pub alerts: Vec<String>,
}

/// Largest categories first, at most `n`
pub fn top_categories(by_category: &BTreeMap<Category, f64>, total: f64, n: usize) -> Vec<CategoryShare> {
    let mut shares: Vec<CategoryShare> = by_category
        .iter()
        .map(|(category, amount)| CategoryShare {
            category: *category,
            amount: *amount,
            percent: if total > 0.0 { amount / total * 100.0 } else { 0.0 },
        })
        .collect();
    shares.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    shares.truncate(n);
    shares
}

pub fn month_status(
    total_spent: f64,
    general_limit: f64,
    by_category: &BTreeMap<Category, f64>,
    category_limits: &[CategoryLimit],
) -> MonthStatus {
    let percent_used = percent_used(total_spent, general_limit).unwrap_or(0.0);
    let mut alerts = Vec::new();

    match threshold(total_spent, general_limit) {
        Some(AlertLevel::Exceeded) => alerts.push("🚨 Você excedeu seu limite mensal!".to_string()),
        Some(AlertLevel::Warning) => alerts
            .push("⚠️ Atenção: você já usou mais de 80% do seu limite mensal!".to_string()),
        None => {}
    }

    for limit in category_limits {
        let spent = by_category.get(&limit.category).copied().unwrap_or(0.0);
        match evaluate(AlertScope::Category(limit.category), spent, limit.monthly_limit) {
            Some(alert) if alert.level == AlertLevel::Exceeded => alerts.push(format!(
                "🚨 Limite da categoria \"{}\" excedido!",
                limit.category.label()
            )),
            Some(alert) => alerts.push(format!(
                "⚠️ Categoria \"{}\" próxima do limite ({:.0}%)!",
                limit.category.label(),
                alert.percent
            )),
            None => {}
        }
    }

    MonthStatus {
        total_spent,
        general_limit,
        percent_used,
        remaining: general_limit - total_spent,
        top_categories: top_categories(by_category, total_spent, 3),
        alerts,
    }
}
