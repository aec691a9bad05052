use super::{CardStore, PageRequest, PageResult};
use crate::compile::Predicate;
use crate::render::{SqlParam, SqlTranslator};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Instant;

/// One JSON document per card in `table.data_column`, partitioned by
/// `table.model_column`.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    table: String,
    data_column: String,
    model_column: String,
    translator: SqlTranslator,
}

macro_rules! bind_params {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for param in $params {
            query = match param {
                SqlParam::Text(s) => query.bind(s.clone()),
                SqlParam::Integer(i) => query.bind(*i),
                SqlParam::Float(x) => query.bind(*x),
            };
        }
        query
    }};
}

impl SqliteStore {
    pub async fn connect(
        url: &str,
        table: &str,
        data_column: &str,
        model_column: &str,
    ) -> Result<Self> {
        for identifier in [table, data_column, model_column] {
            if !is_identifier(identifier) {
                bail!("Invalid SQL identifier: {}", identifier);
            }
        }

        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database url {}", url))?
            .create_if_missing(true)
            .with_regexp();
        // every connection to :memory: opens a fresh database
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open {}", url))?;

        Ok(Self {
            pool,
            table: table.to_string(),
            data_column: data_column.to_string(),
            model_column: model_column.to_string(),
            translator: SqlTranslator::new(data_column),
        })
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                {model} TEXT NOT NULL,
                {data} TEXT NOT NULL
            )",
            table = self.table,
            model = self.model_column,
            data = self.data_column,
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        let index = format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_{model} ON {table} ({model})",
            table = self.table,
            model = self.model_column,
        );
        sqlx::query(&index).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn insert(&self, model_id: &str, card: &Value) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} ({}, {}) VALUES (?, ?)",
            self.table, self.model_column, self.data_column
        );
        sqlx::query(&sql)
            .bind(model_id)
            .bind(serde_json::to_string(card)?)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub fn translator(&self) -> &SqlTranslator {
        &self.translator
    }
}

#[async_trait]
impl CardStore for SqliteStore {
    async fn fetch(
        &self,
        model_id: &str,
        predicate: &Predicate,
        page: &PageRequest,
    ) -> Result<PageResult> {
        let started = Instant::now();
        let fragment = self.translator.translate(predicate);
        let filter = format!(
            "FROM {} WHERE {} = ? AND ({})",
            self.table, self.model_column, fragment.clause
        );

        let count_sql = format!("SELECT COUNT(*) {}", filter);
        let count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(model_id);
        let total = bind_params!(count_query, &fragment.params)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count matching cards")?;

        let order = match &page.sort {
            Some(sort) => format!("{}, id ASC", self.translator.order_by(sort)),
            None => "ORDER BY id ASC".to_string(),
        };
        let rows_sql = format!(
            "SELECT {} {} {} LIMIT ? OFFSET ?",
            self.data_column, filter, order
        );
        let rows_query = sqlx::query_scalar::<_, String>(&rows_sql).bind(model_id);
        let documents = bind_params!(rows_query, &fragment.params)
            .bind(i64::from(page.page_size))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch matching cards")?;

        let rows = documents
            .iter()
            .map(|doc| serde_json::from_str(doc).context("Stored card is not valid JSON"))
            .collect::<Result<Vec<Value>>>()?;

        Ok(PageResult {
            rows,
            total: total as u64,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
