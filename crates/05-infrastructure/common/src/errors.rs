//! 错误类型定义

use crate::metadata::{InterfaceKey, ObjectKey};
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("配置源读取失败: {source_name}, 原因: {message}")]
    SourceUnreadable { source_name: String, message: String },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置类型转换失败: {key}, 原因: {message}")]
    TypeConversionError { key: String, message: String },
}

impl ConfigError {
    /// 创建配置源读取错误
    pub fn unreadable(source_name: impl Into<String>, message: impl ToString) -> Self {
        Self::SourceUnreadable {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }
}

/// 注册错误类型
#[derive(Error, Debug, Clone)]
pub enum RegistrationError {
    #[error("对象已存在: {key}")]
    DuplicateObject { key: ObjectKey },

    #[error("不支持的注册: {type_name}, 原因: {message}")]
    Unsupported { type_name: String, message: String },

    #[error("接口不存在: {interface}")]
    InterfaceNotFound { interface: InterfaceKey },

    #[error("容器已完成加载，拒绝注册: {key}")]
    ContainerSealed { key: ObjectKey },
}

/// 依赖注入错误类型
#[derive(Error, Debug, Clone)]
pub enum DependencyError {
    #[error("对象未找到: {key}")]
    ObjectNotFound { key: ObjectKey },

    #[error("缺少依赖对象: {key}, 依赖方: {dependant}")]
    MissingDependency { key: ObjectKey, dependant: String },

    #[error("接口缺少实现: {interface}")]
    MissingImplementation { interface: InterfaceKey },

    #[error("实现过滤条件无效: {pattern}, 原因: {message}")]
    InvalidFilter { pattern: String, message: String },

    #[error("类型转换失败: {key}, 期望类型: {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("工厂调用失败: {type_name}, 原因: {source}")]
    FactoryFailed {
        type_name: &'static str,
        source: Arc<dyn StdError + Send + Sync>,
    },

    #[error("检测到循环依赖: {chain}")]
    CircularDependency { chain: String },
}

/// 容器错误类型
///
/// Load 的结果会被缓存并返回给之后的每一次触发，因此所有错误都实现了 [`Clone`]。
#[derive(Error, Debug, Clone)]
pub enum ContainerError {
    #[error("注册错误: {source}")]
    Registration {
        #[from]
        source: RegistrationError,
    },

    #[error("配置错误: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    Dependency {
        #[from]
        source: DependencyError,
    },
}

/// 故障类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// 提供者形状错误、重复标识、注册时机错误
    Registration,
    /// 配置源不可读、缺少必需的配置键、配置值无法转换
    Configuration,
    /// 缺少对象、接口缺少实现
    Dependency,
    /// 工厂返回错误
    Factory,
    /// 循环依赖
    Cycle,
}

impl ContainerError {
    /// 错误所属的故障类别
    pub fn kind(&self) -> FaultKind {
        match self {
            Self::Registration { .. } => FaultKind::Registration,
            Self::Config { .. } => FaultKind::Configuration,
            Self::Dependency { source } => match source {
                DependencyError::FactoryFailed { .. } => FaultKind::Factory,
                DependencyError::CircularDependency { .. } => FaultKind::Cycle,
                _ => FaultKind::Dependency,
            },
        }
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type RegistrationResult<T> = Result<T, RegistrationError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type ContainerResult<T> = Result<T, ContainerError>;
