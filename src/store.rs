use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::models::{Category, CategoryLimit, Expense, NewExpense, User, YearMonth};

/// Next id to hand out for each table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counters {
    #[serde(rename = "usuario")]
    pub user: u64,
    #[serde(rename = "gasto")]
    pub expense: u64,
    pub limite_categoria: u64,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            user: 1,
            expense: 1,
            limite_categoria: 1,
        }
    }
}

/// Whole-file database document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(rename = "usuarios", default)]
    pub users: Vec<User>,
    #[serde(rename = "gastos", default)]
    pub expenses: Vec<Expense>,
    #[serde(rename = "limites_categoria", default)]
    pub category_limits: Vec<CategoryLimit>,
    #[serde(default)]
    pub counters: Counters,
}

// serde_json writes NaN and infinities as null, which the file cannot load back.
fn ensure_amount(amount: f64) -> Result<()> {
    anyhow::ensure!(amount.is_finite(), "Amount {amount} cannot be stored");
    Ok(())
}

/// Shareable JSON-file store for use across async handlers
///
/// The whole document lives in memory behind a lock; every mutation
/// rewrites the file before the lock is released.
#[derive(Clone)]
pub struct JsonStore {
    path: Arc<PathBuf>,
    data: Arc<RwLock<Database>>,
}

impl JsonStore {
    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::open(&config.data_file).await
    }

    /// Open the data file, starting with an empty database if it is missing
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let data = if tokio::fs::try_exists(&path)
            .await
            .with_context(|| format!("Failed to check data file {}", path.display()))?
        {
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read data file {}", path.display()))?;
            let db: Database = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse data file {}", path.display()))?;
            tracing::info!(
                "Loaded data file {} ({} users, {} expenses, {} category limits)",
                path.display(),
                db.users.len(),
                db.expenses.len(),
                db.category_limits.len()
            );
            db
        } else {
            tracing::info!("Data file {} not found, starting empty", path.display());
            Database::default()
        };

        Ok(Self {
            path: Arc::new(path),
            data: Arc::new(RwLock::new(data)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, db: &Database) -> Result<()> {
        let content = serde_json::to_string_pretty(db).context("Failed to serialize database")?;
        tokio::fs::write(self.path.as_ref(), content)
            .await
            .with_context(|| format!("Failed to write data file {}", self.path.display()))?;
        tracing::debug!("Wrote data file {}", self.path.display());
        Ok(())
    }

    /// Write `next` to disk and only then make it the in-memory state
    async fn commit(&self, db: &mut Database, next: Database) -> Result<()> {
        self.persist(&next).await?;
        *db = next;
        Ok(())
    }

    /// Verify the data file's directory is reachable
    pub async fn health_check(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let meta = tokio::fs::metadata(&dir)
            .await
            .with_context(|| format!("Data directory {} is not accessible", dir.display()))?;
        if !meta.is_dir() {
            anyhow::bail!("{} is not a directory", dir.display());
        }
        // Readers block while a writer holds the lock; this confirms the store isn't wedged.
        let _db = self.data.read().await;
        Ok(())
    }

    pub async fn find_or_create_user(&self, phone: &str) -> Result<User> {
        {
            let db = self.data.read().await;
            if let Some(user) = db.users.iter().find(|u| u.phone == phone) {
                return Ok(user.clone());
            }
        }

        let mut db = self.data.write().await;
        // Another request may have created it between the two locks.
        if let Some(user) = db.users.iter().find(|u| u.phone == phone) {
            return Ok(user.clone());
        }

        let mut next = db.clone();
        let user = User {
            id: next.counters.user,
            phone: phone.to_string(),
            created_at: Utc::now(),
            monthly_limit: 0.0,
        };
        next.counters.user += 1;
        next.users.push(user.clone());
        self.commit(&mut db, next).await?;

        tracing::info!("Created user {} for phone {}", user.id, phone);
        Ok(user)
    }

    pub async fn find_user(&self, id: u64) -> Option<User> {
        let db = self.data.read().await;
        db.users.iter().find(|u| u.id == id).cloned()
    }

    pub async fn list_users(&self) -> Vec<User> {
        self.data.read().await.users.clone()
    }

    /// Update a user's general monthly limit
    ///
    /// # Returns
    /// * `Ok(Some(user))` - The updated user
    /// * `Ok(None)` - No user with that id
    pub async fn set_general_limit(&self, user_id: u64, amount: f64) -> Result<Option<User>> {
        ensure_amount(amount)?;
        let mut db = self.data.write().await;
        let mut next = db.clone();
        let Some(user) = next.users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };
        user.monthly_limit = amount;
        let updated = user.clone();
        self.commit(&mut db, next).await?;

        tracing::debug!("Set general limit of user {} to {:.2}", user_id, amount);
        Ok(Some(updated))
    }

    pub async fn insert_expense(&self, new: NewExpense) -> Result<Expense> {
        ensure_amount(new.amount)?;
        let mut db = self.data.write().await;
        let mut next = db.clone();
        let expense = Expense {
            id: next.counters.expense,
            user_id: new.user_id,
            date: new.date,
            description: new.description,
            amount: new.amount,
            category: new.category,
            payment_method: new.payment_method,
        };
        next.counters.expense += 1;
        next.expenses.push(expense.clone());
        self.commit(&mut db, next).await?;

        tracing::debug!("Inserted expense {} for user {}", expense.id, expense.user_id);
        Ok(expense)
    }

    /// Remove an expense owned by `user_id`
    ///
    /// The file is only rewritten when a row was actually removed.
    pub async fn delete_expense(&self, id: u64, user_id: u64) -> Result<Option<Expense>> {
        let mut db = self.data.write().await;
        let Some(pos) = db
            .expenses
            .iter()
            .position(|e| e.id == id && e.user_id == user_id)
        else {
            return Ok(None);
        };
        let mut next = db.clone();
        let removed = next.expenses.remove(pos);
        self.commit(&mut db, next).await?;

        tracing::debug!("Deleted expense {} of user {}", id, user_id);
        Ok(Some(removed))
    }

    pub async fn expenses_in_month(&self, user_id: u64, month: YearMonth) -> Vec<Expense> {
        let db = self.data.read().await;
        db.expenses
            .iter()
            .filter(|e| e.user_id == user_id && month.contains(&e.date))
            .cloned()
            .collect()
    }

    /// Up to `limit` expenses of a user in `month`, newest first
    pub async fn recent_expenses(&self, user_id: u64, month: YearMonth, limit: usize) -> Vec<Expense> {
        let mut expenses = self.expenses_in_month(user_id, month).await;
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        expenses.truncate(limit);
        expenses
    }

    /// Insert or update the monthly limit of one category
    pub async fn upsert_category_limit(
        &self,
        user_id: u64,
        category: Category,
        amount: f64,
    ) -> Result<CategoryLimit> {
        ensure_amount(amount)?;
        let mut db = self.data.write().await;
        let mut next = db.clone();

        let limit = if let Some(existing) = next
            .category_limits
            .iter_mut()
            .find(|l| l.user_id == user_id && l.category == category)
        {
            existing.monthly_limit = amount;
            existing.clone()
        } else {
            let limit = CategoryLimit {
                id: next.counters.limite_categoria,
                user_id,
                category,
                monthly_limit: amount,
            };
            next.counters.limite_categoria += 1;
            next.category_limits.push(limit.clone());
            limit
        };
        self.commit(&mut db, next).await?;

        tracing::debug!(
            "Set {} limit of user {} to {:.2}",
            category,
            user_id,
            amount
        );
        Ok(limit)
    }

    pub async fn category_limit(&self, user_id: u64, category: Category) -> Option<CategoryLimit> {
        let db = self.data.read().await;
        db.category_limits
            .iter()
            .find(|l| l.user_id == user_id && l.category == category)
            .cloned()
    }

    pub async fn category_limits(&self, user_id: u64) -> Vec<CategoryLimit> {
        let db = self.data.read().await;
        db.category_limits
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect()
    }
}
