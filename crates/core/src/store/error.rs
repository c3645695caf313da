use thiserror::Error;

/// # Summary
/// 存储层错误枚举，处理数据库连接、事务与读写失败等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 存储错误不在本地重试，也不做恢复，直接上抛为服务器错误。
#[derive(Error, Debug)]
pub enum StoreError {
    /// 数据库操作失败
    #[error("Database error: {0}")]
    Database(String),
    /// 事务开启或提交失败
    #[error("Transaction error: {0}")]
    Transaction(String),
    /// 初始化存储失败
    #[error("Initialization error: {0}")]
    InitError(String),
}
