//! 签名缓存 - 业务能力层
//!
//! 以原始 `d` 字符串为键的有界缓存，可在多线程间共享

use crate::models::PathSignature;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

/// 缓存命中统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, PathSignature>,
    /// 插入顺序，满时淘汰最早插入的键
    order: VecDeque<String>,
}

/// 有界签名缓存
///
/// 容量为 0 时不缓存任何内容。缓存只是优化，不影响计算结果。
#[derive(Debug)]
pub struct SignatureCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SignatureCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheInner::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, d: &str) -> Option<PathSignature> {
        self.inner.lock().entries.get(d).copied()
    }

    /// 查询缓存，未命中时调用 `compute` 计算并写入
    ///
    /// 计算过程不持有锁；并发未命中同一个键时只保留第一次写入
    pub fn get_or_insert_with<F>(&self, d: &str, compute: F) -> PathSignature
    where
        F: FnOnce() -> PathSignature,
    {
        if let Some(sig) = self.get(d) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return sig;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let sig = compute();
        self.insert(d, sig);
        sig
    }

    fn insert(&self, d: &str, sig: PathSignature) {
        if self.capacity == 0 {
            return;
        }

        let mut inner = self.inner.lock();
        if inner.entries.contains_key(d) {
            return;
        }
        while inner.entries.len() >= self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
        inner.order.push_back(d.to_string());
        inner.entries.insert(d.to_string(), sig);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
