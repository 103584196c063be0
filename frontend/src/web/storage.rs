//! 本地存储封装模块
//!
//! - `KeyValueStore`: 原始字符串键值存储接口
//! - `BrowserStorage`: 浏览器 LocalStorage 实现（基于 `gloo-storage`）
//! - `MemoryStorage`: 内存实现，LocalStorage 不可用时的退路，也用于测试
//! - `JsonStore`: 在键值存储之上提供 JSON 序列化

use gloo_storage::Storage;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{SourceError, SourceResult};

/// 原始键值存储接口
pub trait KeyValueStore: Send + Sync {
    /// 获取存储的字符串值，键不存在时返回 `None`
    fn get_item(&self, key: &str) -> Option<String>;

    /// 设置存储值
    fn set_item(&self, key: &str, value: &str) -> SourceResult<()>;

    /// 删除存储的键值对
    fn remove_item(&self, key: &str);
}

/// 浏览器 LocalStorage
pub struct BrowserStorage;

impl BrowserStorage {
    /// 当前环境是否可以使用 LocalStorage（隐私模式等情况下不可用）
    pub fn is_available() -> bool {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .is_some()
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        gloo_storage::LocalStorage::raw().get_item(key).ok()?
    }

    fn set_item(&self, key: &str, value: &str) -> SourceResult<()> {
        gloo_storage::LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| SourceError::Storage(format!("failed to write '{}': {:?}", key, e)))
    }

    fn remove_item(&self, key: &str) {
        gloo_storage::LocalStorage::delete(key);
    }
}

/// 内存键值存储
///
/// 克隆出的句柄共享同一份数据，可以模拟页面重新加载。
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> SourceResult<()> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| SourceError::Storage("memory storage poisoned".to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.remove(key);
        }
    }
}

/// JSON 文档存储
#[derive(Clone)]
pub struct JsonStore {
    inner: Arc<dyn KeyValueStore>,
}

impl JsonStore {
    pub fn new(inner: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// 浏览器存储；不可用时退回到内存存储
    pub fn browser() -> Self {
        if BrowserStorage::is_available() {
            Self::new(BrowserStorage)
        } else {
            leptos::logging::warn!("[Storage] LocalStorage unavailable, data will not survive reloads");
            Self::new(MemoryStorage::new())
        }
    }

    /// 读取并反序列化
    ///
    /// # 返回
    /// - `Ok(None)` 如果键不存在
    /// - `Err(SourceError::Storage)` 如果内容已损坏
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> SourceResult<Option<T>> {
        match self.inner.get_item(key) {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| SourceError::Storage(format!("corrupt entry '{}': {}", key, e))),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> SourceResult<()> {
        let raw = serde_json::to_string(value)
            .map_err(|e| SourceError::Storage(format!("failed to encode '{}': {}", key, e)))?;
        self.inner.set_item(key, &raw)
    }

    pub fn delete(&self, key: &str) {
        self.inner.remove_item(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_handles_share_data() {
        let storage = MemoryStorage::new();
        let reloaded = storage.clone();
        storage.set_item("k", "v").unwrap();
        assert_eq!(reloaded.get_item("k").as_deref(), Some("v"));
        reloaded.remove_item("k");
        assert_eq!(storage.get_item("k"), None);
    }

    #[test]
    fn test_json_store_round_trip_and_missing_key() {
        let store = JsonStore::new(MemoryStorage::new());
        assert_eq!(store.get::<Vec<i64>>("numbers").unwrap(), None);
        store.set("numbers", &vec![1_i64, 2, 3]).unwrap();
        assert_eq!(store.get::<Vec<i64>>("numbers").unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_json_store_reports_corrupt_entries() {
        let storage = MemoryStorage::new();
        storage.set_item("broken", "{not json").unwrap();
        let store = JsonStore::new(storage);
        assert!(matches!(
            store.get::<Vec<i64>>("broken"),
            Err(SourceError::Storage(_))
        ));
    }
}
