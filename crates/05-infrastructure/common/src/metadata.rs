//! 元数据定义
//!
//! 提供对象与接口的类型化标识。标识的比较基于 [`TypeId`]，
//! 类型名称只用于日志与错误信息。

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 类型标记
///
/// 在注册时由编译期类型生成，比较与哈希只使用 [`TypeId`]。
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    /// 类型ID
    id: TypeId,
    /// 完整类型名称
    name: &'static str,
}

impl TypeKey {
    /// 从类型获取类型标记
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// 类型ID
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// 完整类型名称（包含模块路径）
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &'static str {
        // 泛型参数里也可能出现 `::`，只截取尖括号之前的部分
        let head = self.name.split('<').next().unwrap_or(self.name);
        let offset = head.rfind("::").map_or(0, |index| index + 2);
        &self.name[offset..]
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 对象标识
///
/// 由类型标记与别名组成，同一类型使用不同别名注册时是不同的对象。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    type_key: TypeKey,
    alias: String,
}

impl ObjectKey {
    /// 创建新的对象标识
    pub fn new(type_key: TypeKey, alias: impl Into<String>) -> Self {
        Self {
            type_key,
            alias: alias.into(),
        }
    }

    /// 从类型与别名创建对象标识
    pub fn of<T: ?Sized + 'static>(alias: impl Into<String>) -> Self {
        Self::new(TypeKey::of::<T>(), alias)
    }

    /// 不带别名的对象标识
    pub fn bare<T: ?Sized + 'static>() -> Self {
        Self::new(TypeKey::of::<T>(), String::new())
    }

    /// 类型标记
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    /// 别名
    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.type_key.name, self.alias)
    }
}

/// 接口标识
///
/// 接口没有别名维度，每个接口类型只有一个实现列表。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterfaceKey(TypeKey);

impl InterfaceKey {
    /// 从接口类型（通常是 `dyn Trait`）创建接口标识
    pub fn of<I: ?Sized + 'static>() -> Self {
        Self(TypeKey::of::<I>())
    }

    /// 类型标记
    pub fn type_key(&self) -> TypeKey {
        self.0
    }
}

impl fmt::Display for InterfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 对象类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// 单例实例
    Instance,
    /// 工厂函数，首次解析时调用
    Factory,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance => f.write_str("instance"),
            Self::Factory => f.write_str("factory"),
        }
    }
}
