//! 配置源实现
//!
//! 使用 `config` crate 按添加顺序合并文件、环境变量与内联配置，后添加的配置源优先。

use crate::binder::Settings;
use config_abstractions::{ConfigLoader, ConfigStore};
use infrastructure_common::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

/// 默认配置文件路径（不含扩展名，按 toml/json/yaml 等格式查找）
pub const DEFAULT_CONFIG_PATH: &str = "config/app";
/// 默认环境变量前缀
pub const DEFAULT_ENV_PREFIX: &str = "APP";
/// 默认环境变量层级分隔符
pub const DEFAULT_ENV_SEPARATOR: &str = "__";

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    fn file_format(self) -> config::FileFormat {
        match self {
            Self::Toml => config::FileFormat::Toml,
            Self::Json => config::FileFormat::Json,
            Self::Yaml => config::FileFormat::Yaml,
        }
    }
}

/// 配置源描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// 配置文件
    File { path: PathBuf, required: bool },
    /// 环境变量，例如前缀 `APP`、分隔符 `__` 时 `APP__DB__HOST` 对应 `db.host`
    Environment { prefix: String, separator: String },
    /// 内联配置内容
    Inline {
        name: String,
        content: String,
        format: ConfigFormat,
    },
}

impl ConfigSource {
    /// 配置源的可读描述
    pub fn describe(&self) -> String {
        match self {
            Self::File { path, required } => {
                let kind = if *required { "file" } else { "optional-file" };
                format!("{kind}:{}", path.display())
            }
            Self::Environment { prefix, .. } => format!("env:{prefix}"),
            Self::Inline { name, .. } => format!("inline:{name}"),
        }
    }
}

/// 分层配置加载器
#[derive(Debug, Clone, Default)]
pub struct LayeredConfigLoader {
    sources: Vec<ConfigSource>,
}

impl LayeredConfigLoader {
    /// 创建不含任何配置源的加载器
    pub fn new() -> Self {
        Self::default()
    }

    /// 默认配置源：必需的 `config/app` 文件与 `APP` 前缀的环境变量
    pub fn with_defaults() -> Self {
        Self::new()
            .add_file(DEFAULT_CONFIG_PATH)
            .add_environment(DEFAULT_ENV_PREFIX, DEFAULT_ENV_SEPARATOR)
    }

    /// 添加必需的配置文件
    pub fn add_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File {
            path: path.as_ref().to_path_buf(),
            required: true,
        })
    }

    /// 添加可选的配置文件
    pub fn add_optional_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File {
            path: path.as_ref().to_path_buf(),
            required: false,
        })
    }

    /// 添加环境变量配置源
    pub fn add_environment(self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.add_source(ConfigSource::Environment {
            prefix: prefix.into(),
            separator: separator.into(),
        })
    }

    /// 添加内联配置
    pub fn add_inline(
        self,
        name: impl Into<String>,
        content: impl Into<String>,
        format: ConfigFormat,
    ) -> Self {
        self.add_source(ConfigSource::Inline {
            name: name.into(),
            content: content.into(),
            format,
        })
    }

    /// 添加配置源
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// 已添加的配置源
    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    fn describe(&self) -> String {
        self.sources
            .iter()
            .map(ConfigSource::describe)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ConfigLoader for LayeredConfigLoader {
    fn load(&self) -> ConfigResult<Arc<dyn ConfigStore>> {
        let mut builder = config::Config::builder();

        for source in &self.sources {
            debug!("添加配置源: {}", source.describe());
            builder = match source {
                ConfigSource::File { path, required } => builder.add_source(
                    config::File::with_name(&path.to_string_lossy()).required(*required),
                ),
                ConfigSource::Environment { prefix, separator } => builder.add_source(
                    config::Environment::with_prefix(prefix).separator(separator),
                ),
                ConfigSource::Inline {
                    content, format, ..
                } => builder.add_source(config::File::from_str(content, format.file_format())),
            };
        }

        let config = builder.build().map_err(|e| {
            error!("配置读取失败: {}", e);
            ConfigError::unreadable(self.describe(), e)
        })?;

        let root: serde_json::Value = config.try_deserialize().map_err(|e| {
            error!("配置解析失败: {}", e);
            ConfigError::unreadable(self.describe(), e)
        })?;

        let settings = Settings::new(
            root,
            self.sources.iter().map(ConfigSource::describe).collect(),
        );
        info!(
            "配置加载完成: {} 个配置源, {} 个配置键",
            self.sources.len(),
            settings.keys().len()
        );
        Ok(Arc::new(settings))
    }

    fn name(&self) -> &str {
        "LayeredConfigLoader"
    }
}
