//! 依赖注入容器抽象接口
//!
//! 提供依赖注入容器的核心抽象

use crate::registry::{Module, Registry};
use crate::resolver::{downcast_interface, downcast_object, SharedInterface, SharedObject};
use config_abstractions::ConfigLoader;
use infrastructure_common::{ContainerResult, InterfaceKey, ObjectKey, ObjectKind};
use std::sync::Arc;

/// 依赖注入容器 trait
///
/// 注册在启动阶段完成，第一次解析请求触发一次性的 Load。
pub trait DiContainer: Registry + Send + Sync {
    /// 执行 Load，已执行过时直接返回第一次的结果
    fn load(&self) -> ContainerResult<()>;

    /// 按标识解析对象
    fn resolve_by_key(&self, key: &ObjectKey) -> ContainerResult<SharedObject>;

    /// 解析接口的首个实现
    fn resolve_interface_by_key(&self, interface: &InterfaceKey) -> ContainerResult<SharedInterface>;

    /// 解析接口的全部实现，`filter` 是匹配实现别名的正则表达式
    fn resolve_all_by_key(
        &self,
        interface: &InterfaceKey,
        filter: Option<&str>,
    ) -> ContainerResult<Vec<SharedInterface>>;

    /// 检查对象是否已注册
    fn is_registered(&self, key: &ObjectKey) -> bool;

    /// 检查 Load 是否已成功完成
    fn is_loaded(&self) -> bool;

    /// 获取所有已注册对象的描述（按注册顺序）
    fn registered_objects(&self) -> Vec<ObjectDescriptor>;

    /// 获取容器统计信息
    fn stats(&self) -> ContainerStats;

    /// 获取对象
    fn get_object<T>(&self, alias: &str) -> ContainerResult<Arc<T>>
    where
        T: Send + Sync + 'static,
        Self: Sized,
    {
        let key = ObjectKey::of::<T>(alias);
        let shared = self.resolve_by_key(&key)?;
        downcast_object(&key, shared)
    }

    /// 获取接口的首个实现
    fn get_interface<I>(&self) -> ContainerResult<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
        Self: Sized,
    {
        let interface = InterfaceKey::of::<I>();
        let shared = self.resolve_interface_by_key(&interface)?;
        downcast_interface(&interface, shared)
    }

    /// 获取接口的全部实现
    fn get_all<I>(&self, filter: Option<&str>) -> ContainerResult<Vec<Arc<I>>>
    where
        I: ?Sized + Send + Sync + 'static,
        Self: Sized,
    {
        let interface = InterfaceKey::of::<I>();
        self.resolve_all_by_key(&interface, filter)?
            .into_iter()
            .map(|shared| downcast_interface(&interface, shared))
            .collect()
    }
}

/// 容器构建器 trait
pub trait ContainerBuilder {
    /// 关联的容器类型
    type Container: DiContainer;

    /// 设置配置加载器
    fn with_config_loader(self, loader: Arc<dyn ConfigLoader>) -> Self
    where
        Self: Sized;

    /// 添加模块
    fn with_module(self, module: Arc<dyn Module>) -> Self
    where
        Self: Sized;

    /// 构建容器
    fn build(self) -> Self::Container;
}

/// 已注册对象的描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDescriptor {
    /// 对象标识
    pub key: ObjectKey,
    /// 对象类别
    pub kind: ObjectKind,
    /// 是否为可选对象
    pub optional: bool,
    /// 是否已解析
    pub resolved: bool,
    /// 实现的接口
    pub interfaces: Vec<InterfaceKey>,
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 已注册对象数量
    pub registered_objects: usize,
    /// 已解析对象数量
    pub resolved_objects: usize,
    /// 可选对象数量
    pub optional_objects: usize,
    /// 接口数量
    pub interfaces: usize,
    /// 接口绑定总数
    pub bindings: usize,
}
