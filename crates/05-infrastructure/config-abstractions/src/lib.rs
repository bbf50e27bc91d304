//! # Configuration Abstractions
//!
//! 配置抽象层，定义容器加载时读取配置的接口。
//!
//! ## 核心接口
//!
//! - [`ConfigLoader`] - 在容器加载时读取外部配置源
//! - [`ConfigStore`] - 加载后只读的配置存储
//! - [`ConfigSnapshot`] - 作为内置对象注册的配置持有者

pub mod provider;
pub mod snapshot;

pub use provider::*;
pub use snapshot::*;
