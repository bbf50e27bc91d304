//! # 基础设施组合层
//!
//! 这个 crate 是对象装配容器的组合层，负责把配置加载、容器和日志模块
//! 组合成一个可以在进程入口构建一次的应用。
//!
//! ## 主要功能
//!
//! - **应用构建器**: 使用构建者模式收集配置源、模块与对象注册
//! - **日志模块**: 由配置驱动的可选日志句柄
//! - **生命周期管理**: 启动时执行一次性的 Load
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::ApplicationBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = ApplicationBuilder::new()
//!         .add_config_file("config/app")
//!         .add_config_env_vars("APP")
//!         .with_logging_module()
//!         .build()?;
//!
//!     app.start()?;
//!
//!     let name: Option<String> = app.config()?.get("app.name")?;
//!     println!("应用名称: {:?}", name);
//!
//!     app.stop();
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod infrastructure;
pub mod logging;

#[cfg(test)]
mod tests {
    mod integration_tests;
}

// 重新导出主要类型
pub use builder::{ApplicationBuilder, LoggingConfig};
pub use infrastructure::{Application, ApplicationError, ApplicationStatus};
pub use logging::{LogHandle, LoggerConfig, LoggingModule};
