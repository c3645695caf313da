use super::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 购买记录实体，每次购买请求对应一行。
///
/// # Invariants
/// - `id` 由存储层自增分配，创建后记录不可修改、不可删除。
/// - `scheme_name` 是购买时上游名称的冗余副本，与上游数据没有引用约束。
/// - 不存在幂等键：相同输入提交两次会产生两条记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    // 自增主键
    pub id: i64,
    // 基金名称
    pub scheme_name: String,
    // 购买份额
    pub units: i64,
    // 购买时间
    pub purchase_time: DateTime<Utc>,
    // 购买时的单位净值
    pub value: f64,
}

/// # Summary
/// 待写入的购买记录 (尚未分配 `id`)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPurchase {
    pub scheme_name: String,
    pub units: i64,
    pub purchase_time: DateTime<Utc>,
    pub value: f64,
}

impl NewPurchase {
    /// 绑定存储层分配的主键，生成完整记录
    pub fn into_record(self, id: i64) -> PurchaseRecord {
        PurchaseRecord {
            id,
            scheme_name: self.scheme_name,
            units: self.units,
            purchase_time: self.purchase_time,
            value: self.value,
        }
    }
}

/// # Summary
/// 购买账本接口，独占 `PurchaseRecord` 的持久化。
///
/// # Invariants
/// - 每次写入都在独立事务中完成：要么完整提交，要么完全回滚。
/// - 不存在跨多次写入的事务。
#[async_trait]
pub trait PurchaseLedger: Send + Sync {
    /// # Summary
    /// 追加一条购买记录。
    ///
    /// # Logic
    /// 1. 开启事务。
    /// 2. 插入记录并读取分配的主键。
    /// 3. 提交事务；任何中途失败都会随事务句柄释放而回滚。
    ///
    /// # Arguments
    /// * `purchase`: 待写入的记录。
    ///
    /// # Returns
    /// 含主键的完整记录，或 `StoreError`。
    async fn record_purchase(&self, purchase: NewPurchase) -> Result<PurchaseRecord, StoreError>;

    /// # Summary
    /// 读取全部购买记录，按 `id` 升序排列。
    async fn list_purchases(&self) -> Result<Vec<PurchaseRecord>, StoreError>;
}
