//! # Configuration Implementation
//!
//! 配置加载的具体实现，容器加载时通过 [`LayeredConfigLoader`] 读取一次外部配置。
//!
//! ## 主要组件
//!
//! - [`LayeredConfigLoader`] - 分层配置加载器（文件、环境变量、内联内容）
//! - [`ConfigSource`] - 配置源描述
//! - [`Settings`] - 加载完成后的只读配置存储

pub mod binder;
pub mod providers;

pub use binder::*;
pub use providers::*;
