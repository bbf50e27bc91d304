//! 日志模块
//!
//! 以可选对象的形式向容器注册日志配置与日志句柄，
//! 只有在有对象依赖 [`LogHandle`] 或显式获取时才会构建。
//!
//! 日志始终按级别写入 `logger.path` 目录下的文件
//! （`error.log`、`warn.log`、`info.log`、`debug.log`），
//! `logger.enable_terminal_log` 只控制是否同时输出到终端。

use component_macros::Injectable;
use di_abstractions::{Module, Provider, RegisterOptions, Registry};
use infrastructure_common::ContainerResult;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::dispatcher::{self, Dispatch, SetGlobalDefaultError};
use tracing::{info, Level};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{filter_fn, ParseError};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry as SubscriberRegistry};

/// 默认日志级别
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// 默认日志目录
pub const DEFAULT_LOG_PATH: &str = "log";

/// 日志文件与其收集的级别
const LEVEL_FILES: [(&str, &[Level]); 4] = [
    ("error", &[Level::ERROR]),
    ("warn", &[Level::WARN]),
    ("info", &[Level::INFO]),
    ("debug", &[Level::DEBUG, Level::TRACE]),
];

type FilteredRegistry = Layered<EnvFilter, SubscriberRegistry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

/// 日志配置
///
/// 所有键都可以缺省。
#[derive(Debug, Clone, Default, Injectable)]
pub struct LoggerConfig {
    /// 日志级别，例如 `debug`
    #[value("logger.level", optional)]
    pub level: String,
    /// 日志文件目录，缺省为 `log`
    #[value("logger.path", optional)]
    pub path: String,
    /// 是否输出 JSON 格式
    #[value("logger.json", optional)]
    pub json: bool,
    /// 是否同时输出到终端
    #[value("logger.enable_terminal_log", optional)]
    pub enable_terminal_log: bool,
    /// `EnvFilter` 过滤指令，设置后优先于 `level`
    #[value("logger.filter", optional)]
    pub filter: String,
}

impl LoggerConfig {
    /// 实际使用的过滤指令
    pub fn directive(&self) -> &str {
        if !self.filter.is_empty() {
            &self.filter
        } else if !self.level.is_empty() {
            &self.level
        } else {
            DEFAULT_LOG_LEVEL
        }
    }

    /// 实际使用的日志目录
    pub fn log_dir(&self) -> &Path {
        if self.path.is_empty() {
            Path::new(DEFAULT_LOG_PATH)
        } else {
            Path::new(&self.path)
        }
    }
}

/// 日志句柄构建错误
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("日志过滤指令无效: {0}")]
    InvalidFilter(#[from] ParseError),

    #[error("无法创建日志文件 {path}: {message}")]
    FileUnavailable { path: PathBuf, message: String },
}

/// 日志句柄
///
/// 持有按 [`LoggerConfig`] 构建的 `tracing` 分发器。
#[derive(Debug, Clone)]
pub struct LogHandle {
    config: Arc<LoggerConfig>,
    dispatch: Dispatch,
}

impl LogHandle {
    /// 按配置构建日志句柄，过滤指令无效或日志目录不可写时失败
    pub fn new(config: Arc<LoggerConfig>) -> Result<Self, LoggingError> {
        let filter = EnvFilter::try_new(config.directive())?;

        let mut layers: Vec<BoxedLayer> = Vec::new();
        for (name, levels) in LEVEL_FILES {
            let appender = level_file(config.log_dir(), name)?;
            let layer = fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true);
            let only = filter_fn(move |metadata| levels.contains(metadata.level()));
            layers.push(if config.json {
                layer.json().with_filter(only).boxed()
            } else {
                layer.with_filter(only).boxed()
            });
        }

        if config.enable_terminal_log {
            let terminal = fmt::layer().with_writer(std::io::stdout).with_target(true);
            layers.push(if config.json {
                terminal.json().boxed()
            } else {
                terminal.boxed()
            });
        }

        let subscriber = tracing_subscriber::registry().with(filter).with(layers);
        Ok(Self {
            config,
            dispatch: Dispatch::new(subscriber),
        })
    }

    /// 获取日志配置
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// 获取底层分发器
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// 设置为全局默认分发器，只能成功一次
    pub fn install_global(&self) -> Result<(), SetGlobalDefaultError> {
        dispatcher::set_global_default(self.dispatch.clone())?;
        info!(
            "日志系统初始化完成: {}, 目录 {}",
            self.config.directive(),
            self.config.log_dir().display()
        );
        Ok(())
    }

    /// 在当前线程临时使用该分发器执行闭包
    pub fn scoped<T>(&self, f: impl FnOnce() -> T) -> T {
        dispatcher::with_default(&self.dispatch, f)
    }
}

/// 打开 `<dir>/<name>.log`，不滚动
fn level_file(dir: &Path, name: &str) -> Result<RollingFileAppender, LoggingError> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .filename_suffix("log")
        .build(dir)
        .map_err(|e| LoggingError::FileUnavailable {
            path: dir.join(format!("{name}.log")),
            message: e.to_string(),
        })
}

/// 日志模块
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingModule;

impl Module for LoggingModule {
    fn name(&self) -> &str {
        "logging"
    }

    fn register(&self, registry: &dyn Registry) -> ContainerResult<()> {
        registry.register(Provider::injectable::<LoggerConfig>(), RegisterOptions::new())?;
        registry.register(Provider::factory(LogHandle::new), RegisterOptions::new())?;
        Ok(())
    }
}
