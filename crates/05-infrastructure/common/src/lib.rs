//! # Infrastructure Common
//!
//! 这个 crate 提供了对象装配容器各层共享的基础类型。
//!
//! ## 核心内容
//!
//! - [`TypeKey`] / [`ObjectKey`] / [`InterfaceKey`] - 类型化的对象与接口标识
//! - [`ObjectKind`] - 对象类别（实例或工厂）
//! - [`ContainerError`] - 注册、配置、依赖解析的错误分类
//!
//! ## 设计原则
//!
//! - 标识比较基于 `TypeId`，不拼接字符串
//! - 错误可克隆，容器加载结果可以重复返回

pub mod errors;
pub mod metadata;

pub use errors::*;
pub use metadata::*;
