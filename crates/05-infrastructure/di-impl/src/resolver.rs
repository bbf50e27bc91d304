//! 递归依赖解析器

use crate::interface::{Implementation, InterfacePool};
use crate::object::{Object, ObjectPool};
use config_abstractions::ConfigStore;
use di_abstractions::{Resolver, SharedInterface, SharedObject};
use infrastructure_common::{ContainerResult, DependencyError, InterfaceKey, ObjectKey};
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

/// 依赖注入器
///
/// 沿依赖边深度优先解析对象，结果记录在对象上。
/// `chain` 是当前正在解析的对象链，用于报告缺失的依赖方与循环依赖。
pub struct Injector<'a> {
    objects: &'a ObjectPool,
    interfaces: &'a InterfacePool,
    config: Arc<dyn ConfigStore>,
    chain: Vec<ObjectKey>,
}

impl<'a> Injector<'a> {
    /// 创建空解析链的注入器
    pub fn new(
        objects: &'a ObjectPool,
        interfaces: &'a InterfacePool,
        config: Arc<dyn ConfigStore>,
    ) -> Self {
        Self {
            objects,
            interfaces,
            config,
            chain: Vec::new(),
        }
    }

    /// 解析对象，已解析时直接返回记录的值
    pub fn resolve(&mut self, object: &Object) -> ContainerResult<SharedObject> {
        if let Some(value) = object.value() {
            return Ok(value);
        }

        if !object.begin_resolution() {
            return Err(DependencyError::CircularDependency {
                chain: self.cycle_chain(object.key()),
            }
            .into());
        }

        debug!("解析对象: {} ({})", object.key(), object.kind());
        self.chain.push(object.key().clone());
        let result = object.provider().build(self);
        self.chain.pop();
        object.end_resolution();

        Ok(object.memoize(result?))
    }

    /// 从重复出现的对象开始拼出循环链
    fn cycle_chain(&self, key: &ObjectKey) -> String {
        let start = self
            .chain
            .iter()
            .position(|entry| entry == key)
            .unwrap_or(0);
        self.chain[start..]
            .iter()
            .chain(std::iter::once(key))
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    fn resolve_implementation(
        &mut self,
        interface: &InterfaceKey,
        implementation: Implementation,
    ) -> ContainerResult<SharedInterface> {
        let value = self.resolve_object(&implementation.object)?;
        implementation.binding.cast(value).ok_or_else(|| {
            DependencyError::TypeMismatch {
                key: implementation.object.to_string(),
                expected: interface.type_key().name(),
            }
            .into()
        })
    }
}

impl Resolver for Injector<'_> {
    fn resolve_object(&mut self, key: &ObjectKey) -> ContainerResult<SharedObject> {
        let object = match self.objects.get(key) {
            Some(object) => object,
            None => {
                let error = match self.chain.last() {
                    Some(dependant) => DependencyError::MissingDependency {
                        key: key.clone(),
                        dependant: dependant.to_string(),
                    },
                    None => DependencyError::ObjectNotFound { key: key.clone() },
                };
                return Err(error.into());
            }
        };
        self.resolve(&object)
    }

    fn resolve_interface(&mut self, interface: &InterfaceKey) -> ContainerResult<SharedInterface> {
        let first = self
            .interfaces
            .implementations(interface)
            .and_then(|implementations| implementations.into_iter().next())
            .ok_or(DependencyError::MissingImplementation {
                interface: *interface,
            })?;
        self.resolve_implementation(interface, first)
    }

    fn resolve_all(
        &mut self,
        interface: &InterfaceKey,
        filter: Option<&Regex>,
    ) -> ContainerResult<Vec<SharedInterface>> {
        let implementations = self.interfaces.implementations(interface).unwrap_or_default();
        implementations
            .into_iter()
            .filter(|implementation| {
                filter.map_or(true, |regex| regex.is_match(implementation.object.alias()))
            })
            .map(|implementation| self.resolve_implementation(interface, implementation))
            .collect()
    }

    fn config(&self) -> Arc<dyn ConfigStore> {
        Arc::clone(&self.config)
    }
}
