//! 髒標記追蹤

use std::collections::HashSet;

/// 需要重新計算的產品追蹤器
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    dirty_products: HashSet<String>,
}

impl DirtyTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 標記產品為髒
    pub fn mark_dirty(&mut self, product_id: &str) {
        if !self.dirty_products.contains(product_id) {
            self.dirty_products.insert(product_id.to_string());
        }
    }

    /// 批次標記
    pub fn mark_all<'a>(&mut self, product_ids: impl IntoIterator<Item = &'a String>) {
        self.dirty_products.extend(product_ids.into_iter().cloned());
    }

    /// 檢查產品是否為髒
    pub fn is_dirty(&self, product_id: &str) -> bool {
        self.dirty_products.contains(product_id)
    }

    /// 是否有任何待重算的產品
    pub fn has_dirty(&self) -> bool {
        !self.dirty_products.is_empty()
    }

    /// 取出所有髒產品（按產品ID排序）並清除標記
    pub fn take_dirty_products(&mut self) -> Vec<String> {
        let mut products: Vec<String> = self.dirty_products.drain().collect();
        products.sort();
        products
    }
}
