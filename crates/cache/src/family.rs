use navgate_core::cache::port::FamilyCache;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

/// # Summary
/// 基于快照替换的基金家族缓存实现。
///
/// # Invariants
/// - 内部只保存一个 `Arc<BTreeSet<String>>`，写入时整体换掉指针，从不原地修改集合。
/// - 读取者拿到的是快照的克隆引用，持有期间不受后续替换影响。
/// - 锁只在交换指针的瞬间持有，不跨越任何 IO。
pub struct MemFamilyCache {
    current: RwLock<Arc<BTreeSet<String>>>,
}

impl MemFamilyCache {
    /// # Summary
    /// 创建一个空缓存。
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(BTreeSet::new())),
        }
    }
}

impl Default for MemFamilyCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FamilyCache for MemFamilyCache {
    fn snapshot(&self) -> Arc<BTreeSet<String>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// # Summary
    /// 整体替换缓存内容。
    ///
    /// # Logic
    /// 1. 在锁外构造新快照。
    /// 2. 获取写锁后用 `std::mem::replace` 交换指针并返回旧快照。
    fn replace(&self, families: BTreeSet<String>) -> Arc<BTreeSet<String>> {
        let next = Arc::new(families);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}
