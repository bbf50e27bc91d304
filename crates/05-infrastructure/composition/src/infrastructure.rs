//! 应用主入口

use crate::builder::ApplicationBuilder;
use config_abstractions::ConfigSnapshot;
use di_abstractions::{ContainerStats, DiContainer, ObjectDescriptor};
use di_impl::ContainerImpl;
use infrastructure_common::{ContainerError, ContainerResult};
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// 应用错误类型
#[derive(Error, Debug, Clone)]
pub enum ApplicationError {
    #[error("容器错误: {source}")]
    Container {
        #[from]
        source: ContainerError,
    },

    #[error("日志初始化失败: {message}")]
    LoggingInitFailed { message: String },
}

/// 应用运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    /// 已构建，尚未加载
    Initialized,
    /// 运行中
    Running,
    /// 已停止
    Stopped,
    /// 加载失败
    Failed,
}

/// 应用
///
/// 持有一个显式构建的容器，启动时执行 Load。
pub struct Application {
    container: Arc<ContainerImpl>,
    status: RwLock<ApplicationStatus>,
}

impl Application {
    /// 创建应用构建器
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    pub(crate) fn new(container: ContainerImpl) -> Self {
        Self {
            container: Arc::new(container),
            status: RwLock::new(ApplicationStatus::Initialized),
        }
    }

    /// 启动应用：执行 Load，失败时状态变为 `Failed`
    pub fn start(&self) -> Result<(), ApplicationError> {
        info!("启动应用");

        if let Err(e) = self.container.load() {
            error!("应用启动失败: {}", e);
            *self.status.write() = ApplicationStatus::Failed;
            return Err(e.into());
        }

        *self.status.write() = ApplicationStatus::Running;
        let stats = self.container.stats();
        info!(
            "应用启动完成: {} 个对象, {} 个已解析",
            stats.registered_objects, stats.resolved_objects
        );
        Ok(())
    }

    /// 停止应用
    pub fn stop(&self) {
        info!("停止应用");
        *self.status.write() = ApplicationStatus::Stopped;
    }

    /// 获取运行状态
    pub fn status(&self) -> ApplicationStatus {
        *self.status.read()
    }

    /// 获取对象
    pub fn get_object<T: Send + Sync + 'static>(&self, alias: &str) -> ContainerResult<Arc<T>> {
        self.container.get_object(alias)
    }

    /// 获取接口的首个实现
    pub fn get_interface<I: ?Sized + Send + Sync + 'static>(&self) -> ContainerResult<Arc<I>> {
        self.container.get_interface()
    }

    /// 获取接口的全部实现
    pub fn get_all<I: ?Sized + Send + Sync + 'static>(
        &self,
        filter: Option<&str>,
    ) -> ContainerResult<Vec<Arc<I>>> {
        self.container.get_all(filter)
    }

    /// 获取配置快照
    pub fn config(&self) -> ContainerResult<Arc<ConfigSnapshot>> {
        self.container.get_object("")
    }

    /// 获取已注册的对象列表
    pub fn registered_objects(&self) -> Vec<ObjectDescriptor> {
        self.container.registered_objects()
    }

    /// 获取容器统计信息
    pub fn stats(&self) -> ContainerStats {
        self.container.stats()
    }

    /// 获取容器引用
    pub fn container(&self) -> &Arc<ContainerImpl> {
        &self.container
    }
}
