use std::collections::BTreeSet;
use std::sync::Arc;

/// # Summary
/// 基金家族名称缓存接口 (Port)。
///
/// # Invariants
/// - 进程级共享状态：启动时写入一次，之后只读。
/// - 读取返回不可变快照 (`Arc`)，写入只能整体替换，不允许原地修改。
pub trait FamilyCache: Send + Sync {
    /// # Summary
    /// 获取当前的家族名称快照。
    ///
    /// # Returns
    /// 未初始化或初始化失败时返回空集合。
    fn snapshot(&self) -> Arc<BTreeSet<String>>;

    /// # Summary
    /// 以原子方式整体替换缓存内容。
    ///
    /// # Arguments
    /// * `families`: 新的家族名称集合。
    ///
    /// # Returns
    /// 被替换掉的旧快照。
    fn replace(&self, families: BTreeSet<String>) -> Arc<BTreeSet<String>>;
}
