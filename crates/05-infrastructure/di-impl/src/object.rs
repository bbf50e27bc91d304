//! 托管对象与对象池

use di_abstractions::{Provider, SharedObject};
use infrastructure_common::{
    InterfaceKey, ObjectKey, ObjectKind, RegistrationError, RegistrationResult,
};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 托管对象
///
/// 注册时创建，处于未解析状态；解析成功后值只会被写入一次，之后不再变化。
pub struct Object {
    key: ObjectKey,
    provider: Provider,
    optional: bool,
    interfaces: Vec<InterfaceKey>,
    value: OnceCell<SharedObject>,
    in_progress: AtomicBool,
}

impl Object {
    /// 创建未解析的对象
    pub fn new(
        key: ObjectKey,
        provider: Provider,
        optional: bool,
        interfaces: Vec<InterfaceKey>,
    ) -> Self {
        Self {
            key,
            provider,
            optional,
            interfaces,
            value: OnceCell::new(),
            in_progress: AtomicBool::new(false),
        }
    }

    /// 对象标识
    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    /// 对象类别
    pub fn kind(&self) -> ObjectKind {
        self.provider.kind()
    }

    /// 对象的提供者
    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// 是否为可选对象
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// 实现的接口
    pub fn interfaces(&self) -> &[InterfaceKey] {
        &self.interfaces
    }

    /// 是否已解析
    pub fn is_resolved(&self) -> bool {
        self.value.get().is_some()
    }

    /// 已解析的值
    pub fn value(&self) -> Option<SharedObject> {
        self.value.get().cloned()
    }

    /// 记录解析结果，返回最终保存的值
    pub fn memoize(&self, value: SharedObject) -> SharedObject {
        Arc::clone(self.value.get_or_init(|| value))
    }

    /// 标记开始解析，对象已在解析中时返回 `false`
    pub fn begin_resolution(&self) -> bool {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// 标记解析结束（无论成功与否）
    pub fn end_resolution(&self) {
        self.in_progress.store(false, Ordering::Release);
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("key", &self.key)
            .field("kind", &self.kind())
            .field("optional", &self.optional)
            .field("resolved", &self.is_resolved())
            .field("interfaces", &self.interfaces)
            .finish()
    }
}

#[derive(Default)]
struct PoolInner {
    order: Vec<Arc<Object>>,
    by_key: HashMap<ObjectKey, Arc<Object>>,
}

/// 对象池
///
/// 只追加不删除，保留注册顺序。
#[derive(Default)]
pub struct ObjectPool {
    inner: RwLock<PoolInner>,
}

impl ObjectPool {
    /// 创建空的对象池
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加对象，标识重复时失败
    pub fn insert(&self, object: Object) -> RegistrationResult<Arc<Object>> {
        let mut inner = self.inner.write();
        if inner.by_key.contains_key(object.key()) {
            return Err(RegistrationError::DuplicateObject {
                key: object.key().clone(),
            });
        }

        let object = Arc::new(object);
        inner.by_key.insert(object.key().clone(), Arc::clone(&object));
        inner.order.push(Arc::clone(&object));
        Ok(object)
    }

    /// 按标识查找对象
    pub fn get(&self, key: &ObjectKey) -> Option<Arc<Object>> {
        self.inner.read().by_key.get(key).cloned()
    }

    /// 标识是否已注册
    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.inner.read().by_key.contains_key(key)
    }

    /// 按注册顺序复制出所有对象
    pub fn snapshot(&self) -> Vec<Arc<Object>> {
        self.inner.read().order.clone()
    }

    /// 对象数量
    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ObjectPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("objects", &self.len())
            .finish()
    }
}
