//! 配置快照
//!
//! 容器加载时作为内置可选对象注册，需要整棵配置树的对象可以直接依赖它。

use crate::provider::ConfigStore;
use infrastructure_common::ConfigResult;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// 只读配置快照
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    store: Arc<dyn ConfigStore>,
}

impl ConfigSnapshot {
    /// 创建新的配置快照
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// 获取并转换配置值，键不存在时返回 `None`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<Option<T>> {
        self.store.get(key)
    }

    /// 获取并转换必需的配置值
    pub fn require<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<T> {
        self.store.require(key)
    }

    /// 获取原始配置值
    pub fn get_value(&self, key: &str) -> Option<Value> {
        self.store.get_value(key)
    }

    /// 检查配置键是否存在
    pub fn contains_key(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// 获取所有配置键
    pub fn keys(&self) -> Vec<String> {
        self.store.keys()
    }

    /// 底层存储
    pub fn store(&self) -> &Arc<dyn ConfigStore> {
        &self.store
    }
}
