//! 只读配置存储实现

use config_abstractions::ConfigStore;
use serde_json::{Map, Value};

/// 已加载的配置树
///
/// 由 [`LayeredConfigLoader`](crate::LayeredConfigLoader) 在容器加载时生成一次。
#[derive(Debug, Clone)]
pub struct Settings {
    root: Value,
    sources: Vec<String>,
}

impl Settings {
    /// 创建新的配置存储
    pub fn new(root: Value, sources: Vec<String>) -> Self {
        Self { root, sources }
    }

    /// 从 JSON 值直接创建配置存储
    pub fn from_value(root: Value) -> Self {
        Self::new(root, vec!["value".to_string()])
    }

    /// 生成该配置的配置源描述
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// 从嵌套路径获取值
    fn get_nested_value(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for part in path.split('.') {
            let table = current.as_object()?;
            current = match table.get(part) {
                Some(value) => value,
                // 环境变量来源的键会被转为小写
                None => table
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(part))
                    .map(|(_, value)| value)?,
            };
        }
        Some(current)
    }

    /// 递归收集所有键
    fn collect_keys(table: &Map<String, Value>, prefix: &str, keys: &mut Vec<String>) {
        for (key, value) in table {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            if let Value::Object(nested) = value {
                Self::collect_keys(nested, &full_key, keys);
            }
            keys.push(full_key);
        }
    }
}

impl ConfigStore for Settings {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.get_nested_value(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Value::Object(table) = &self.root {
            Self::collect_keys(table, "", &mut keys);
        }
        keys.sort();
        keys
    }

    fn name(&self) -> &str {
        "Settings"
    }
}
