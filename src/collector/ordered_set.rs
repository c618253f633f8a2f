//! 发现顺序去重集合
//!
//! 收集循环的累积容器：保留首次发现的顺序，天然去重，
//! 最终按"最早发现在前"反转输出

use std::collections::HashSet;

/// 按插入顺序去重的标识符集合
#[derive(Debug, Default)]
pub struct DiscoverySet {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl DiscoverySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 插入一个标识符，已存在时返回 false
    pub fn insert(&mut self, id: String) -> bool {
        if !self.seen.insert(id.clone()) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// 合并一批标识符，返回新增数量
    pub fn merge<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.len();
        for id in ids {
            self.insert(id);
        }
        self.len() - before
    }

    /// 反转发现顺序并截断到 limit，消费自身
    pub fn into_oldest_first(self, limit: usize) -> Vec<String> {
        let mut ids = self.order;
        ids.reverse();
        ids.truncate(limit);
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(ids: &[&str]) -> DiscoverySet {
        let mut set = DiscoverySet::new();
        set.merge(ids.iter().map(|s| s.to_string()));
        set
    }

    #[test]
    fn test_insert_dedups() {
        let mut set = DiscoverySet::new();
        assert!(set.insert("a".to_string()));
        assert!(!set.insert("a".to_string()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_merge_returns_new_count() {
        let mut set = set_of(&["a", "b"]);
        let added = set.merge(vec!["b".to_string(), "c".to_string(), "d".to_string()]);
        assert_eq!(added, 2);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_merge_never_shrinks() {
        let mut set = set_of(&["a", "b", "c"]);
        let before = set.len();
        set.merge(vec!["a".to_string()]);
        assert!(set.len() >= before);
    }

    #[test]
    fn test_into_oldest_first_reverses() {
        let set = set_of(&["a", "b", "c"]);
        assert_eq!(set.into_oldest_first(10), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_into_oldest_first_truncates_after_reversal() {
        let set = set_of(&["a", "b", "c", "d"]);
        // 先反转再截断：留下的是最后发现的那一段
        assert_eq!(set.into_oldest_first(2), vec!["d", "c"]);
    }

    #[test]
    fn test_order_is_first_discovery() {
        let mut set = set_of(&["a", "b"]);
        set.merge(vec!["a".to_string(), "c".to_string()]);
        assert_eq!(set.into_oldest_first(10), vec!["c", "b", "a"]);
    }
}
