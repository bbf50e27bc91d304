//! 依赖解析抽象接口
//!
//! [`Resolver`] 是对象在注入自身字段、工厂在准备参数时看到的解析入口。
//! trait 本身只处理类型擦除后的值，类型化的方法定义在 `dyn Resolver` 上。

use config_abstractions::{convert_value, ConfigStore};
use infrastructure_common::{
    ConfigError, ContainerResult, DependencyError, InterfaceKey, ObjectKey,
};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::any::{type_name, Any};
use std::sync::Arc;

/// 类型擦除后的对象值
pub type SharedObject = Arc<dyn Any + Send + Sync>;

/// 类型擦除后的接口值，内部保存 `Arc<dyn Trait>`
pub type SharedInterface = Box<dyn Any + Send + Sync>;

/// 依赖解析器 trait
pub trait Resolver {
    /// 按标识解析对象，未解析的对象会被递归解析
    fn resolve_object(&mut self, key: &ObjectKey) -> ContainerResult<SharedObject>;

    /// 解析接口的首个实现（按注册顺序）
    fn resolve_interface(&mut self, interface: &InterfaceKey) -> ContainerResult<SharedInterface>;

    /// 解析接口的全部实现，可以按实现对象的别名过滤
    fn resolve_all(
        &mut self,
        interface: &InterfaceKey,
        filter: Option<&Regex>,
    ) -> ContainerResult<Vec<SharedInterface>>;

    /// 加载完成的配置存储
    fn config(&self) -> Arc<dyn ConfigStore>;
}

impl<'a> dyn Resolver + 'a {
    /// 解析结构体类型的依赖
    pub fn object<T: Send + Sync + 'static>(&mut self, alias: &str) -> ContainerResult<Arc<T>> {
        let key = ObjectKey::of::<T>(alias);
        let shared = self.resolve_object(&key)?;
        downcast_object(&key, shared)
    }

    /// 解析接口类型的依赖
    pub fn interface<I: ?Sized + Send + Sync + 'static>(&mut self) -> ContainerResult<Arc<I>> {
        let interface = InterfaceKey::of::<I>();
        let shared = self.resolve_interface(&interface)?;
        downcast_interface(&interface, shared)
    }

    /// 解析接口的全部实现
    ///
    /// `pattern` 是匹配实现对象别名的正则表达式，`None` 表示不过滤。
    pub fn interfaces<I: ?Sized + Send + Sync + 'static>(
        &mut self,
        pattern: Option<&str>,
    ) -> ContainerResult<Vec<Arc<I>>> {
        let interface = InterfaceKey::of::<I>();
        let filter = pattern.map(compile_filter).transpose()?;
        self.resolve_all(&interface, filter.as_ref())?
            .into_iter()
            .map(|shared| downcast_interface(&interface, shared))
            .collect()
    }

    /// 读取必需的配置值
    pub fn value<T: DeserializeOwned>(&self, key: &str) -> ContainerResult<T> {
        self.optional_value(key)?.ok_or_else(|| {
            ConfigError::KeyNotFound {
                key: key.to_string(),
            }
            .into()
        })
    }

    /// 读取可缺省的配置值
    pub fn optional_value<T: DeserializeOwned>(&self, key: &str) -> ContainerResult<Option<T>> {
        match self.config().get_value(key) {
            Some(value) => Ok(Some(convert_value(key, value)?)),
            None => Ok(None),
        }
    }
}

/// 将对象值转换为具体类型
pub fn downcast_object<T: Send + Sync + 'static>(
    key: &ObjectKey,
    shared: SharedObject,
) -> ContainerResult<Arc<T>> {
    shared.downcast::<T>().map_err(|_| {
        DependencyError::TypeMismatch {
            key: key.to_string(),
            expected: type_name::<T>(),
        }
        .into()
    })
}

/// 将接口值转换为 `Arc<dyn Trait>`
pub fn downcast_interface<I: ?Sized + Send + Sync + 'static>(
    interface: &InterfaceKey,
    shared: SharedInterface,
) -> ContainerResult<Arc<I>> {
    shared
        .downcast::<Arc<I>>()
        .map(|boxed| *boxed)
        .map_err(|_| {
            DependencyError::TypeMismatch {
                key: interface.to_string(),
                expected: type_name::<Arc<I>>(),
            }
            .into()
        })
}

/// 编译别名过滤条件
pub fn compile_filter(pattern: &str) -> ContainerResult<Regex> {
    Regex::new(pattern).map_err(|e| {
        DependencyError::InvalidFilter {
            pattern: pattern.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}
