//! 应用构建器

use crate::infrastructure::{Application, ApplicationError};
use crate::logging::LoggingModule;
use config_impl::{ConfigFormat, ConfigSource, LayeredConfigLoader, DEFAULT_ENV_SEPARATOR};
use di_abstractions::{ContainerBuilder, Module, Provider, RegisterOptions, Registry};
use di_impl::DiContainerBuilder;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// 应用构建器
///
/// 使用建造者模式收集配置源、模块和对象注册，构建出 [`Application`]。
pub struct ApplicationBuilder {
    /// 配置加载器
    config_loader: LayeredConfigLoader,
    /// 模块列表
    modules: Vec<Arc<dyn Module>>,
    /// 待注册的对象
    registrations: Vec<(Provider, RegisterOptions)>,
    /// 启动日志配置，`None` 表示不初始化
    logging: Option<LoggingConfig>,
}

impl ApplicationBuilder {
    /// 创建不含任何配置源的构建器
    pub fn new() -> Self {
        Self {
            config_loader: LayeredConfigLoader::new(),
            modules: Vec::new(),
            registrations: Vec::new(),
            logging: None, // 默认不初始化日志，避免测试中重复初始化
        }
    }

    /// 使用默认配置源：`config/app` 文件与 `APP` 前缀的环境变量
    pub fn with_default_config(mut self) -> Self {
        for source in LayeredConfigLoader::with_defaults().sources() {
            self.config_loader = self.config_loader.add_source(source.clone());
        }
        self
    }

    /// 添加必需的配置文件
    pub fn add_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        info!("添加配置文件: {}", path.as_ref().display());
        self.config_loader = self.config_loader.add_file(path);
        self
    }

    /// 添加可选的配置文件
    pub fn add_optional_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        info!("添加可选配置文件: {}", path.as_ref().display());
        self.config_loader = self.config_loader.add_optional_file(path);
        self
    }

    /// 添加环境变量配置源，层级分隔符为 `__`
    pub fn add_config_env_vars<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);
        self.config_loader = self
            .config_loader
            .add_environment(prefix, DEFAULT_ENV_SEPARATOR);
        self
    }

    /// 添加内联配置
    pub fn add_inline_config(
        mut self,
        name: impl Into<String>,
        content: impl Into<String>,
        format: ConfigFormat,
    ) -> Self {
        self.config_loader = self.config_loader.add_inline(name, content, format);
        self
    }

    /// 添加配置源
    pub fn add_config_source(mut self, source: ConfigSource) -> Self {
        self.config_loader = self.config_loader.add_source(source);
        self
    }

    /// 添加模块
    pub fn with_module<M: Module + 'static>(mut self, module: M) -> Self {
        debug!("添加模块: {}", module.name());
        self.modules.push(Arc::new(module));
        self
    }

    /// 添加日志模块
    pub fn with_logging_module(self) -> Self {
        self.with_module(LoggingModule)
    }

    /// 注册对象
    pub fn register(mut self, provider: Provider, options: RegisterOptions) -> Self {
        self.registrations.push((provider, options));
        self
    }

    /// 初始化启动日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    /// 构建应用
    ///
    /// 只注册对象，不执行 Load。
    pub fn build(self) -> Result<Application, ApplicationError> {
        info!("开始构建应用");

        if let Some(logging) = &self.logging {
            logging.initialize()?;
        }

        let mut container_builder = DiContainerBuilder::new()
            .with_config_loader(Arc::new(self.config_loader));
        for module in self.modules {
            container_builder = container_builder.with_module(module);
        }
        let container = container_builder.build();

        let count = self.registrations.len();
        for (provider, options) in self.registrations {
            container.register(provider, options)?;
        }

        info!("应用构建完成，注册了 {} 个对象", count);
        Ok(Application::new(container))
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 启动日志配置
///
/// 在容器加载之前把容器自身的日志输出到终端。
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            json_format: true,
        }
    }

    /// 安装全局日志订阅器
    fn initialize(&self) -> Result<(), ApplicationError> {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(self.level)
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids);

        if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| ApplicationError::LoggingInitFailed {
            message: e.to_string(),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}
