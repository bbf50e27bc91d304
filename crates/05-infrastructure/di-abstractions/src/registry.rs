//! 对象注册抽象接口
//!
//! 注册时提供 [`Provider`]（对象如何产生）与 [`RegisterOptions`]（别名、接口绑定、是否可选）。

use crate::factory::{ConstructorFn, FactoryFn};
use crate::resolver::{Resolver, SharedInterface, SharedObject};
use config_abstractions::ConfigSnapshot;
use infrastructure_common::{
    ContainerResult, DependencyError, InterfaceKey, ObjectKey, ObjectKind, TypeKey,
};
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

/// 类型擦除后的对象构建函数
pub type BuildFn = Box<dyn Fn(&mut dyn Resolver) -> ContainerResult<SharedObject> + Send + Sync>;

/// 类型擦除后的接口转换函数
pub type InterfaceCast = Arc<dyn Fn(SharedObject) -> Option<SharedInterface> + Send + Sync>;

/// 可注入类型 trait
///
/// 类型在这里声明自己需要哪些依赖，由解析器逐个提供。
/// 通常通过 `#[derive(Injectable)]` 生成。
pub trait Injectable: Sized + Send + Sync + 'static {
    /// 从解析器获取依赖并构造自身
    fn inject(resolver: &mut dyn Resolver) -> ContainerResult<Self>;
}

impl Injectable for ConfigSnapshot {
    fn inject(resolver: &mut dyn Resolver) -> ContainerResult<Self> {
        Ok(ConfigSnapshot::new(resolver.config()))
    }
}

/// 对象提供者
///
/// 描述一个对象的类型、类别以及构建方式。
pub struct Provider {
    type_key: TypeKey,
    kind: ObjectKind,
    parameters: Vec<TypeKey>,
    build: BuildFn,
}

impl Provider {
    /// 已构造好的单例实例
    pub fn instance<T: Send + Sync + 'static>(value: T) -> Self {
        Self::shared(Arc::new(value))
    }

    /// 外部提供的共享实例
    pub fn shared<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        let shared: SharedObject = value;
        Self {
            type_key: TypeKey::of::<T>(),
            kind: ObjectKind::Instance,
            parameters: Vec::new(),
            build: Box::new(move |_resolver: &mut dyn Resolver| Ok(Arc::clone(&shared))),
        }
    }

    /// 字段由 [`Injectable`] 注入的实例
    pub fn injectable<T: Injectable>() -> Self {
        Self {
            type_key: TypeKey::of::<T>(),
            kind: ObjectKind::Instance,
            parameters: Vec::new(),
            build: Box::new(|resolver: &mut dyn Resolver| {
                let value: SharedObject = Arc::new(T::inject(resolver)?);
                Ok(value)
            }),
        }
    }

    /// 可能失败的工厂函数，对象类型由返回值决定
    pub fn factory<Args, F>(factory: F) -> Self
    where
        F: FactoryFn<Args>,
    {
        Self {
            type_key: TypeKey::of::<F::Output>(),
            kind: ObjectKind::Factory,
            parameters: F::parameters(),
            build: Box::new(move |resolver: &mut dyn Resolver| {
                match factory.invoke(resolver)? {
                    Ok(value) => {
                        let value: SharedObject = Arc::new(value);
                        Ok(value)
                    }
                    Err(e) => Err(DependencyError::FactoryFailed {
                        type_name: type_name::<F::Output>(),
                        source: Arc::from(e),
                    }
                    .into()),
                }
            }),
        }
    }

    /// 不会失败的构造函数
    pub fn constructor<Args, F>(constructor: F) -> Self
    where
        F: ConstructorFn<Args>,
    {
        Self {
            type_key: TypeKey::of::<F::Output>(),
            kind: ObjectKind::Factory,
            parameters: F::parameters(),
            build: Box::new(move |resolver: &mut dyn Resolver| {
                let value: SharedObject = Arc::new(constructor.invoke(resolver)?);
                Ok(value)
            }),
        }
    }

    /// 对象类型
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    /// 对象类别
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// 工厂参数类型，实例为空
    pub fn parameters(&self) -> &[TypeKey] {
        &self.parameters
    }

    /// 构建对象
    pub fn build(&self, resolver: &mut dyn Resolver) -> ContainerResult<SharedObject> {
        (self.build)(resolver)
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("type_key", &self.type_key)
            .field("kind", &self.kind)
            .field("parameters", &self.parameters)
            .field("build", &"<function>")
            .finish()
    }
}

/// 接口绑定
///
/// 记录实现类型以及把实现对象转换为 `Arc<dyn Trait>` 的方式。
#[derive(Clone)]
pub struct InterfaceBinding {
    interface: InterfaceKey,
    implementation: TypeKey,
    cast: InterfaceCast,
}

impl InterfaceBinding {
    /// 创建接口绑定
    ///
    /// `cast` 通常写成 `|value| value`，由编译器完成到 `Arc<dyn Trait>` 的转换。
    pub fn new<I, T>(cast: fn(Arc<T>) -> Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        Self {
            interface: InterfaceKey::of::<I>(),
            implementation: TypeKey::of::<T>(),
            cast: Arc::new(move |shared: SharedObject| {
                let concrete = shared.downcast::<T>().ok()?;
                let interface: SharedInterface = Box::new(cast(concrete));
                Some(interface)
            }),
        }
    }

    /// 接口标识
    pub fn interface(&self) -> InterfaceKey {
        self.interface
    }

    /// 实现类型
    pub fn implementation(&self) -> TypeKey {
        self.implementation
    }

    /// 将实现对象转换为接口值
    pub fn cast(&self, shared: SharedObject) -> Option<SharedInterface> {
        (self.cast)(shared)
    }
}

impl fmt::Debug for InterfaceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceBinding")
            .field("interface", &self.interface)
            .field("implementation", &self.implementation)
            .finish()
    }
}

/// 注册选项
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    alias: String,
    optional: bool,
    bindings: Vec<InterfaceBinding>,
}

impl RegisterOptions {
    /// 创建默认注册选项：无别名、非可选、无接口绑定
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置对象别名
    pub fn name(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// 标记为可选对象，Load 时不强制解析
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// 声明对象实现了接口 `I`
    pub fn implement<I, T>(self, cast: fn(Arc<T>) -> Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.bind(InterfaceBinding::new(cast))
    }

    /// 添加接口绑定
    pub fn bind(mut self, binding: InterfaceBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// 对象别名
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// 是否为可选对象
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// 接口绑定
    pub fn bindings(&self) -> &[InterfaceBinding] {
        &self.bindings
    }

    /// 拆分为别名、可选标记与接口绑定
    pub fn into_parts(self) -> (String, bool, Vec<InterfaceBinding>) {
        (self.alias, self.optional, self.bindings)
    }
}

/// 对象注册表 trait
pub trait Registry {
    /// 注册对象，返回对象标识
    fn register(&self, provider: Provider, options: RegisterOptions) -> ContainerResult<ObjectKey>;
}

/// 模块 trait
///
/// 协作方（例如日志模块）通过模块向容器注册自己的对象。
/// 容器在 Load 时调用模块，模块注册的对象一律视为可选对象。
pub trait Module: Send + Sync + fmt::Debug {
    /// 模块名称
    fn name(&self) -> &str;

    /// 注册模块内的对象
    fn register(&self, registry: &dyn Registry) -> ContainerResult<()>;
}
