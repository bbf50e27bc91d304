//! 配置存储抽象接口

use infrastructure_common::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// 配置存储 trait
///
/// 容器加载时填充一次，之后只读。键是点分路径，例如 `db.host`。
pub trait ConfigStore: Send + Sync + Debug {
    /// 获取配置值
    fn get_value(&self, key: &str) -> Option<Value>;

    /// 检查配置键是否存在
    fn contains_key(&self, key: &str) -> bool {
        self.get_value(key).is_some()
    }

    /// 获取所有配置键
    fn keys(&self) -> Vec<String>;

    /// 获取存储名称
    fn name(&self) -> &str;
}

impl<'a> dyn ConfigStore + 'a {
    /// 获取并转换配置值，键不存在时返回 `None`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<Option<T>> {
        self.get_value(key)
            .map(|value| convert_value(key, value))
            .transpose()
    }

    /// 获取并转换必需的配置值
    pub fn require<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<T> {
        self.get(key)?.ok_or_else(|| ConfigError::KeyNotFound {
            key: key.to_string(),
        })
    }
}

/// 配置加载器 trait
///
/// 在容器加载时读取外部配置源，之后不再监听变化。
pub trait ConfigLoader: Send + Sync + Debug {
    /// 读取全部配置源并生成只读存储
    fn load(&self) -> ConfigResult<Arc<dyn ConfigStore>>;

    /// 获取加载器名称
    fn name(&self) -> &str;
}

/// 将配置值转换为目标类型
///
/// 环境变量一类的配置源只提供字符串，转换失败时会把字符串按标量重新解析一次，
/// 反之数字和布尔值也可以绑定到字符串字段。
pub fn convert_value<T: DeserializeOwned>(key: &str, value: Value) -> ConfigResult<T> {
    let first_error = match serde_json::from_value::<T>(value.clone()) {
        Ok(converted) => return Ok(converted),
        Err(e) => e,
    };

    let fallback = match &value {
        Value::String(raw) => serde_json::from_str::<Value>(raw.trim()).ok(),
        Value::Number(_) | Value::Bool(_) => Some(Value::String(value.to_string())),
        _ => None,
    };

    fallback
        .and_then(|candidate| serde_json::from_value::<T>(candidate).ok())
        .ok_or_else(|| ConfigError::TypeConversionError {
            key: key.to_string(),
            message: first_error.to_string(),
        })
}

/// 空配置存储
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyConfigStore;

impl ConfigStore for EmptyConfigStore {
    fn get_value(&self, _key: &str) -> Option<Value> {
        None
    }

    fn keys(&self) -> Vec<String> {
        Vec::new()
    }

    fn name(&self) -> &str {
        "EmptyConfigStore"
    }
}

/// 不读取任何配置源的加载器
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyConfigLoader;

impl ConfigLoader for EmptyConfigLoader {
    fn load(&self) -> ConfigResult<Arc<dyn ConfigStore>> {
        Ok(Arc::new(EmptyConfigStore))
    }

    fn name(&self) -> &str {
        "EmptyConfigLoader"
    }
}
