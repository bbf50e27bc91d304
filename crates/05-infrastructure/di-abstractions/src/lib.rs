//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义对象注册和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`Provider`] / [`RegisterOptions`] - 对象提供者与注册选项
//! - [`Injectable`] - 类型自身声明依赖的注入入口
//! - [`Resolver`] - 递归依赖解析器接口
//! - [`FactoryFn`] / [`ConstructorFn`] - 工厂函数
//! - [`DiContainer`] - 依赖注入容器接口
//! - [`Module`] - 协作方注册对象的模块接口

pub mod container;
pub mod factory;
pub mod registry;
pub mod resolver;

pub use container::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
