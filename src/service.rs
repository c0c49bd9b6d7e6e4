use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::BTreeMap;

use crate::alerts::{self, AlertScope, LimitAlert, MonthStatus};
use crate::formatter;
use crate::models::{
    Category, CategoryLimit, Expense, NewExpense, PaymentMethod, User, YearMonth,
};
use crate::store::JsonStore;
use crate::tips;

/// Everything shown in a monthly report
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub user: User,
    pub expenses: Vec<Expense>,
    pub total: f64,
    pub by_category: BTreeMap<Category, f64>,
    pub by_payment_method: BTreeMap<PaymentMethod, f64>,
    pub general_limit: f64,
    pub category_limits: Vec<CategoryLimit>,
}

/// Month total of one category and how it compares to its limit
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpending {
    pub category: Category,
    pub total: f64,
    pub limit: Option<f64>,
    pub percent: Option<f64>,
}

pub fn total(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

pub fn totals_by_category(expenses: &[Expense]) -> BTreeMap<Category, f64> {
    let mut totals = BTreeMap::new();
    for e in expenses {
        *totals.entry(e.category).or_insert(0.0) += e.amount;
    }
    totals
}

pub fn totals_by_payment_method(expenses: &[Expense]) -> BTreeMap<PaymentMethod, f64> {
    let mut totals = BTreeMap::new();
    for e in expenses {
        *totals.entry(e.payment_method).or_insert(0.0) += e.amount;
    }
    totals
}

/// Business operations over the store
///
/// Users are addressed by phone number and created on first contact.
/// All month-scoped figures use the current UTC month.
#[derive(Clone)]
pub struct FinanceService {
    store: JsonStore,
}

impl FinanceService {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    pub async fn get_or_create_user(&self, phone: &str) -> Result<User> {
        self.store.find_or_create_user(phone).await
    }

    pub async fn list_users(&self) -> Vec<User> {
        self.store.list_users().await
    }

    /// Record an expense and report the limits it pushed past 80%
    pub async fn add_expense(
        &self,
        phone: &str,
        amount: f64,
        category: Category,
        payment_method: PaymentMethod,
        description: &str,
    ) -> Result<(Expense, Vec<LimitAlert>)> {
        let user = self.get_or_create_user(phone).await?;

        let expense = self
            .store
            .insert_expense(NewExpense {
                user_id: user.id,
                date: Utc::now(),
                description: description.to_string(),
                amount,
                category,
                payment_method,
            })
            .await?;

        let alerts = self.check_limits(user.id, Some(category)).await?;

        tracing::info!(
            "Recorded expense {} of {:.2} ({}) for {} with {} alert(s)",
            expense.id,
            amount,
            category,
            phone,
            alerts.len()
        );
        Ok((expense, alerts))
    }

    /// Evaluate the general limit and, when given, one category limit
    ///
    /// The general alert comes first.
    pub async fn check_limits(
        &self,
        user_id: u64,
        category: Option<Category>,
    ) -> Result<Vec<LimitAlert>> {
        let user = self
            .store
            .find_user(user_id)
            .await
            .with_context(|| format!("User {user_id} not found"))?;

        let expenses = self.store.expenses_in_month(user_id, YearMonth::current()).await;
        let mut alerts = Vec::new();

        if let Some(alert) = alerts::evaluate(AlertScope::General, total(&expenses), user.monthly_limit) {
            alerts.push(alert);
        }

        if let Some(category) = category {
            if let Some(limit) = self.store.category_limit(user_id, category).await {
                let spent: f64 = expenses
                    .iter()
                    .filter(|e| e.category == category)
                    .map(|e| e.amount)
                    .sum();
                if let Some(alert) =
                    alerts::evaluate(AlertScope::Category(category), spent, limit.monthly_limit)
                {
                    alerts.push(alert);
                }
            }
        }

        Ok(alerts)
    }

    pub async fn set_general_limit(&self, phone: &str, amount: f64) -> Result<User> {
        let user = self.get_or_create_user(phone).await?;
        let updated = self
            .store
            .set_general_limit(user.id, amount)
            .await?
            .with_context(|| format!("User {} disappeared while updating limit", user.id))?;

        tracing::info!("General limit of {} set to {:.2}", phone, amount);
        Ok(updated)
    }

    pub async fn set_category_limit(
        &self,
        phone: &str,
        category: Category,
        amount: f64,
    ) -> Result<CategoryLimit> {
        let user = self.get_or_create_user(phone).await?;
        let limit = self.store.upsert_category_limit(user.id, category, amount).await?;

        tracing::info!("{} limit of {} set to {:.2}", category, phone, amount);
        Ok(limit)
    }

    pub async fn monthly_report(&self, phone: &str) -> Result<MonthlyReport> {
        let user = self.get_or_create_user(phone).await?;
        let expenses = self.store.expenses_in_month(user.id, YearMonth::current()).await;
        let category_limits = self.store.category_limits(user.id).await;

        Ok(MonthlyReport {
            total: total(&expenses),
            by_category: totals_by_category(&expenses),
            by_payment_method: totals_by_payment_method(&expenses),
            general_limit: user.monthly_limit,
            category_limits,
            expenses,
            user,
        })
    }

    pub async fn category_spending(&self, phone: &str, category: Category) -> Result<CategorySpending> {
        let user = self.get_or_create_user(phone).await?;
        let total: f64 = self
            .store
            .expenses_in_month(user.id, YearMonth::current())
            .await
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.amount)
            .sum();
        let limit = self
            .store
            .category_limit(user.id, category)
            .await
            .map(|l| l.monthly_limit);

        Ok(CategorySpending {
            category,
            total,
            limit,
            percent: limit.and_then(|l| alerts::percent_used(total, l)),
        })
    }

    /// Delete one of the user's expenses
    ///
    /// # Returns
    /// * `Ok(Some(expense))` - The removed expense
    /// * `Ok(None)` - The user has no expense with that id
    pub async fn delete_expense(&self, phone: &str, expense_id: u64) -> Result<Option<Expense>> {
        let user = self.get_or_create_user(phone).await?;
        let removed = self.store.delete_expense(expense_id, user.id).await?;

        match &removed {
            Some(_) => tracing::info!("Deleted expense {} of {}", expense_id, phone),
            None => tracing::info!("Expense {} of {} not found", expense_id, phone),
        }
        Ok(removed)
    }

    /// Current-month expenses, newest first
    pub async fn recent_expenses(&self, phone: &str, limit: usize) -> Result<Vec<Expense>> {
        let user = self.get_or_create_user(phone).await?;
        Ok(self
            .store
            .recent_expenses(user.id, YearMonth::current(), limit)
            .await)
    }

    pub async fn month_status(&self, phone: &str) -> Result<MonthStatus> {
        let report = self.monthly_report(phone).await?;
        Ok(alerts::month_status(
            report.total,
            report.general_limit,
            &report.by_category,
            &report.category_limits,
        ))
    }

    /// Financial-education summary text for one user
    pub async fn daily_summary(&self, phone: &str) -> Result<String> {
        let status = self.month_status(phone).await?;
        let tip = tips::savings_tip(&status.top_categories, Utc::now());
        Ok(formatter::daily_summary(&status, tip))
    }
}
