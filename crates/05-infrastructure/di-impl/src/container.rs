//! 依赖注入容器实现

use crate::interface::InterfacePool;
use crate::object::{Object, ObjectPool};
use crate::resolver::Injector;
use config_abstractions::{ConfigLoader, ConfigSnapshot, ConfigStore, EmptyConfigLoader, EmptyConfigStore};
use di_abstractions::{
    compile_filter, ContainerBuilder, ContainerStats, DiContainer, InterfaceBinding, Module,
    ObjectDescriptor, Provider, RegisterOptions, Registry, SharedInterface, SharedObject,
};
use infrastructure_common::{
    ContainerResult, DependencyError, InterfaceKey, ObjectKey, RegistrationError,
};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 依赖注入容器
///
/// 持有一个对象池与一个接口池。第一次解析请求触发 Load，
/// Load 的结果（成功或错误）会被记录并返回给之后的每一次触发。
pub struct ContainerImpl {
    objects: ObjectPool,
    interfaces: InterfacePool,
    config_loader: Arc<dyn ConfigLoader>,
    modules: Vec<Arc<dyn Module>>,
    config: OnceCell<Arc<dyn ConfigStore>>,
    loaded: OnceCell<ContainerResult<()>>,
    /// Load 之后按需解析可选对象时使用的锁
    resolution: Mutex<()>,
}

impl ContainerImpl {
    /// 创建不读取任何配置源、不带模块的容器
    pub fn new() -> Self {
        DiContainerBuilder::new().build()
    }

    /// 创建构建器
    pub fn builder() -> DiContainerBuilder {
        DiContainerBuilder::new()
    }

    /// Load 读取到的配置，Load 未成功前为空配置
    pub fn config(&self) -> Arc<dyn ConfigStore> {
        match self.config.get() {
            Some(store) => Arc::clone(store),
            None => Arc::new(EmptyConfigStore),
        }
    }

    fn run_load(&self) -> ContainerResult<()> {
        info!(
            "开始加载容器: {} 个对象, 配置加载器 {}",
            self.objects.len(),
            self.config_loader.name()
        );

        self.register_builtins().map_err(|e| {
            error!("内置对象注册失败: {}", e);
            e
        })?;

        let store = self.config_loader.load().map_err(|e| {
            error!("配置加载失败: {}", e);
            e
        })?;
        let store = Arc::clone(self.config.get_or_init(|| store));

        let _guard = self.resolution.lock();
        let mut injector = Injector::new(&self.objects, &self.interfaces, store);
        for object in self.objects.snapshot() {
            if object.is_resolved() || object.is_optional() {
                continue;
            }
            injector.resolve(&object).map_err(|e| {
                error!("对象解析失败: {}, 原因: {}", object.key(), e);
                e
            })?;
        }

        let stats = self.stats();
        info!(
            "容器加载完成: 注册 {} 个对象, 解析 {} 个, 可选 {} 个, 接口 {} 个",
            stats.registered_objects,
            stats.resolved_objects,
            stats.optional_objects,
            stats.interfaces
        );
        Ok(())
    }

    /// 注册内置对象，全部为可选对象
    fn register_builtins(&self) -> ContainerResult<()> {
        let snapshot = ObjectKey::bare::<ConfigSnapshot>();
        if !self.objects.contains(&snapshot) {
            self.register(
                Provider::injectable::<ConfigSnapshot>(),
                RegisterOptions::new().optional(),
            )?;
        }

        let registry = OptionalRegistry { container: self };
        for module in &self.modules {
            info!("注册模块: {}", module.name());
            module.register(&registry)?;
        }
        Ok(())
    }

    /// 获取对象的值，Load 时未解析的可选对象在这里按需解析
    fn object_value(&self, object: &Object) -> ContainerResult<SharedObject> {
        if let Some(value) = object.value() {
            return Ok(value);
        }

        let _guard = self.resolution.lock();
        debug!("按需解析对象: {}", object.key());
        Injector::new(&self.objects, &self.interfaces, self.config()).resolve(object)
    }

    fn interface_value(
        &self,
        interface: &InterfaceKey,
        object: &ObjectKey,
        binding: &InterfaceBinding,
    ) -> ContainerResult<SharedInterface> {
        let found = self
            .objects
            .get(object)
            .ok_or_else(|| DependencyError::ObjectNotFound { key: object.clone() })?;
        let value = self.object_value(&found)?;
        binding.cast(value).ok_or_else(|| {
            DependencyError::TypeMismatch {
                key: object.to_string(),
                expected: interface.type_key().name(),
            }
            .into()
        })
    }

    fn descriptor(object: &Object) -> ObjectDescriptor {
        ObjectDescriptor {
            key: object.key().clone(),
            kind: object.kind(),
            optional: object.is_optional(),
            resolved: object.is_resolved(),
            interfaces: object.interfaces().to_vec(),
        }
    }
}

impl Default for ContainerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContainerImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerImpl")
            .field("objects", &self.objects)
            .field("interfaces", &self.interfaces)
            .field("config_loader", &self.config_loader)
            .field("modules", &self.modules)
            .field("loaded", &self.loaded.get().is_some())
            .finish()
    }
}

impl Registry for ContainerImpl {
    fn register(&self, provider: Provider, options: RegisterOptions) -> ContainerResult<ObjectKey> {
        let (alias, optional, bindings) = options.into_parts();
        let type_key = provider.type_key();
        let key = ObjectKey::new(type_key, alias);

        if self.loaded.get().is_some() {
            warn!("容器已加载，拒绝注册: {}", key);
            return Err(RegistrationError::ContainerSealed { key }.into());
        }

        if let Some(binding) = bindings
            .iter()
            .find(|binding| binding.implementation() != type_key)
        {
            return Err(RegistrationError::Unsupported {
                type_name: type_key.name().to_string(),
                message: format!(
                    "接口 {} 绑定的实现类型是 {}",
                    binding.interface(),
                    binding.implementation()
                ),
            }
            .into());
        }

        let interfaces = bindings.iter().map(InterfaceBinding::interface).collect();
        let kind = provider.kind();
        self.objects
            .insert(Object::new(key.clone(), provider, optional, interfaces))?;

        for binding in bindings {
            self.interfaces.declare(binding.interface());
            self.interfaces.bind(&key, binding)?;
        }

        debug!(
            "注册对象: {} ({}{})",
            key,
            kind,
            if optional { ", 可选" } else { "" }
        );
        Ok(key)
    }
}

impl DiContainer for ContainerImpl {
    fn load(&self) -> ContainerResult<()> {
        self.loaded.get_or_init(|| self.run_load()).clone()
    }

    fn resolve_by_key(&self, key: &ObjectKey) -> ContainerResult<SharedObject> {
        self.load()?;
        let object = self
            .objects
            .get(key)
            .ok_or_else(|| DependencyError::ObjectNotFound { key: key.clone() })?;
        self.object_value(&object)
    }

    fn resolve_interface_by_key(&self, interface: &InterfaceKey) -> ContainerResult<SharedInterface> {
        self.load()?;
        let first = self
            .interfaces
            .implementations(interface)
            .and_then(|implementations| implementations.into_iter().next())
            .ok_or(DependencyError::MissingImplementation {
                interface: *interface,
            })?;
        self.interface_value(interface, &first.object, &first.binding)
    }

    fn resolve_all_by_key(
        &self,
        interface: &InterfaceKey,
        filter: Option<&str>,
    ) -> ContainerResult<Vec<SharedInterface>> {
        self.load()?;
        let filter = filter.map(compile_filter).transpose()?;
        self.interfaces
            .implementations(interface)
            .unwrap_or_default()
            .into_iter()
            .filter(|implementation| {
                filter
                    .as_ref()
                    .map_or(true, |regex| regex.is_match(implementation.object.alias()))
            })
            .map(|implementation| {
                self.interface_value(interface, &implementation.object, &implementation.binding)
            })
            .collect()
    }

    fn is_registered(&self, key: &ObjectKey) -> bool {
        self.objects.contains(key)
    }

    fn is_loaded(&self) -> bool {
        matches!(self.loaded.get(), Some(Ok(())))
    }

    fn registered_objects(&self) -> Vec<ObjectDescriptor> {
        self.objects
            .snapshot()
            .iter()
            .map(|object| Self::descriptor(object))
            .collect()
    }

    fn stats(&self) -> ContainerStats {
        let objects = self.objects.snapshot();
        ContainerStats {
            registered_objects: objects.len(),
            resolved_objects: objects.iter().filter(|object| object.is_resolved()).count(),
            optional_objects: objects.iter().filter(|object| object.is_optional()).count(),
            interfaces: self.interfaces.len(),
            bindings: self.interfaces.binding_count(),
        }
    }
}

/// 模块注册使用的注册表，所有对象强制为可选对象
struct OptionalRegistry<'a> {
    container: &'a ContainerImpl,
}

impl Registry for OptionalRegistry<'_> {
    fn register(&self, provider: Provider, options: RegisterOptions) -> ContainerResult<ObjectKey> {
        self.container.register(provider, options.optional())
    }
}

/// 容器构建器实现
#[derive(Debug, Default)]
pub struct DiContainerBuilder {
    config_loader: Option<Arc<dyn ConfigLoader>>,
    modules: Vec<Arc<dyn Module>>,
}

impl DiContainerBuilder {
    /// 创建使用空配置加载器的构建器
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContainerBuilder for DiContainerBuilder {
    type Container = ContainerImpl;

    fn with_config_loader(mut self, loader: Arc<dyn ConfigLoader>) -> Self {
        self.config_loader = Some(loader);
        self
    }

    fn with_module(mut self, module: Arc<dyn Module>) -> Self {
        self.modules.push(module);
        self
    }

    fn build(self) -> ContainerImpl {
        let config_loader = self
            .config_loader
            .unwrap_or_else(|| Arc::new(EmptyConfigLoader));
        debug!(
            "构建容器: 配置加载器 {}, {} 个模块",
            config_loader.name(),
            self.modules.len()
        );

        ContainerImpl {
            objects: ObjectPool::new(),
            interfaces: InterfacePool::new(),
            config_loader,
            modules: self.modules,
            config: OnceCell::new(),
            loaded: OnceCell::new(),
            resolution: Mutex::new(()),
        }
    }
}
