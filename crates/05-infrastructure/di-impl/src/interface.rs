//! 接口与接口池

use di_abstractions::InterfaceBinding;
use infrastructure_common::{InterfaceKey, ObjectKey, RegistrationError, RegistrationResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;

/// 接口的一个实现
#[derive(Debug, Clone)]
pub struct Implementation {
    /// 实现对象的标识
    pub object: ObjectKey,
    /// 接口绑定
    pub binding: InterfaceBinding,
}

/// 接口记录，实现列表按注册顺序排列
#[derive(Debug, Clone)]
pub struct Interface {
    key: InterfaceKey,
    implementations: Vec<Implementation>,
}

impl Interface {
    /// 创建没有实现的接口记录
    pub fn new(key: InterfaceKey) -> Self {
        Self {
            key,
            implementations: Vec::new(),
        }
    }

    /// 接口标识
    pub fn key(&self) -> InterfaceKey {
        self.key
    }

    /// 按注册顺序排列的实现
    pub fn implementations(&self) -> &[Implementation] {
        &self.implementations
    }
}

/// 接口池
#[derive(Default)]
pub struct InterfacePool {
    interfaces: RwLock<HashMap<InterfaceKey, Interface>>,
}

impl InterfacePool {
    /// 创建空的接口池
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明接口，已存在时不做任何事
    pub fn declare(&self, key: InterfaceKey) {
        self.interfaces
            .write()
            .entry(key)
            .or_insert_with(|| Interface::new(key));
    }

    /// 把对象追加到接口的实现列表末尾
    pub fn bind(&self, object: &ObjectKey, binding: InterfaceBinding) -> RegistrationResult<()> {
        let key = binding.interface();
        let mut interfaces = self.interfaces.write();
        let interface = interfaces
            .get_mut(&key)
            .ok_or(RegistrationError::InterfaceNotFound { interface: key })?;

        interface.implementations.push(Implementation {
            object: object.clone(),
            binding,
        });
        Ok(())
    }

    /// 复制出接口的实现列表，接口未声明时返回 `None`
    pub fn implementations(&self, key: &InterfaceKey) -> Option<Vec<Implementation>> {
        self.interfaces
            .read()
            .get(key)
            .map(|interface| interface.implementations.clone())
    }

    /// 接口数量
    pub fn len(&self) -> usize {
        self.interfaces.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 绑定总数
    pub fn binding_count(&self) -> usize {
        self.interfaces
            .read()
            .values()
            .map(|interface| interface.implementations.len())
            .sum()
    }
}

impl fmt::Debug for InterfacePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfacePool")
            .field("interfaces", &self.len())
            .field("bindings", &self.binding_count())
            .finish()
    }
}
