use async_trait::async_trait;
use chrono::{DateTime, Utc};
use navgate_core::store::error::StoreError;
use navgate_core::store::port::{NewPurchase, PurchaseLedger, PurchaseRecord};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// 默认账本数据库文件名
const DEFAULT_LEDGER_DB: &str = "funds.db";

type PurchaseRow = (i64, String, i64, DateTime<Utc>, f64);

/// PurchaseLedger 的 SQLite 实现。
///
/// # Summary
/// 在单个 SQLite 文件的 `purchases` 表中追加并读取购买记录。
///
/// # Invariants
/// * 表结构在实例创建时幂等初始化 (`CREATE TABLE IF NOT EXISTS`)。
/// * 每次写入使用独立事务；事务句柄未提交即被释放时由 `sqlx` 自动回滚。
pub struct SqlitePurchaseLedger {
    pool: SqlitePool,
}

impl SqlitePurchaseLedger {
    /// 在配置的数据根目录下打开 (或创建) `funds.db`。
    ///
    /// # Logic
    /// 1. 获取数据根目录并确保其存在。
    /// 2. 委托给 [`SqlitePurchaseLedger::open`]。
    pub async fn new() -> Result<Self, StoreError> {
        let root = crate::config::get_root_dir();
        fs::create_dir_all(&root).map_err(|e| StoreError::InitError(e.to_string()))?;
        Self::open(&root.join(DEFAULT_LEDGER_DB)).await
    }

    /// 打开指定路径的账本数据库并初始化表结构。
    ///
    /// # Logic
    /// 1. 配置 SQLite 连接选项，开启 `create_if_missing`。
    /// 2. 建立连接池。
    /// 3. 执行 DDL 初始化 `purchases` 表与名称索引。
    ///
    /// # Arguments
    /// * `db_path` - 数据库文件路径。
    ///
    /// # Returns
    /// * `Result<Self, StoreError>` - 账本实例或初始化错误。
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| StoreError::InitError(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS purchases (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                scheme_name TEXT NOT NULL,
                units INTEGER NOT NULL,
                purchase_time DATETIME NOT NULL,
                value REAL NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_purchases_scheme_name ON purchases (scheme_name);
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::InitError(e.to_string()))?;

        info!("Purchase ledger ready at {}", db_path.display());
        Ok(Self { pool })
    }
}

#[async_trait]
impl PurchaseLedger for SqlitePurchaseLedger {
    /// # Summary
    /// 在单个事务内插入一条购买记录。
    ///
    /// # Logic
    /// 1. `begin` 获取事务句柄。
    /// 2. 执行 INSERT 并读取 `last_insert_rowid`。
    /// 3. `commit`；任一步骤通过 `?` 提前返回时，句柄被 drop，事务回滚。
    async fn record_purchase(&self, purchase: NewPurchase) -> Result<PurchaseRecord, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        let id = sqlx::query(
            "INSERT INTO purchases (scheme_name, units, purchase_time, value) VALUES (?, ?, ?, ?)",
        )
        .bind(&purchase.scheme_name)
        .bind(purchase.units)
        .bind(purchase.purchase_time)
        .bind(purchase.value)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?
        .last_insert_rowid();

        tx.commit()
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        debug!("Recorded purchase #{} for {}", id, purchase.scheme_name);
        Ok(purchase.into_record(id))
    }

    async fn list_purchases(&self) -> Result<Vec<PurchaseRecord>, StoreError> {
        let rows = sqlx::query_as::<_, PurchaseRow>(
            "SELECT id, scheme_name, units, purchase_time, value FROM purchases ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| PurchaseRecord {
                id: r.0,
                scheme_name: r.1,
                units: r.2,
                purchase_time: r.3,
                value: r.4,
            })
            .collect())
    }
}
