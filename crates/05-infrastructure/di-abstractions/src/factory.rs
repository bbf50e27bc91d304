//! 工厂函数抽象
//!
//! 工厂参数按类型解析（别名固定为空），支持 0 到 8 个 `Arc<T>` 参数。

use crate::resolver::Resolver;
use infrastructure_common::{ContainerResult, TypeKey};
use std::error::Error as StdError;
use std::sync::Arc;

/// 工厂返回的错误类型
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// 可能失败的工厂函数
///
/// 为 `Fn(Arc<A1>, ..., Arc<An>) -> Result<T, E>` 自动实现。
pub trait FactoryFn<Args>: Send + Sync + 'static {
    /// 工厂产出的对象类型
    type Output: Send + Sync + 'static;

    /// 参数类型列表
    fn parameters() -> Vec<TypeKey>;

    /// 解析参数并调用工厂
    ///
    /// 外层错误来自参数解析，内层错误是工厂自身返回的错误。
    fn invoke(&self, resolver: &mut dyn Resolver)
        -> ContainerResult<Result<Self::Output, BoxError>>;
}

/// 不会失败的构造函数
///
/// 为 `Fn(Arc<A1>, ..., Arc<An>) -> T` 自动实现。
pub trait ConstructorFn<Args>: Send + Sync + 'static {
    /// 构造出的对象类型
    type Output: Send + Sync + 'static;

    /// 参数类型列表
    fn parameters() -> Vec<TypeKey>;

    /// 解析参数并调用构造函数
    fn invoke(&self, resolver: &mut dyn Resolver) -> ContainerResult<Self::Output>;
}

macro_rules! impl_factory_fn {
    ($($param:ident: $arg:ident),*) => {
        impl<F, T, E, $($arg,)*> FactoryFn<($($arg,)*)> for F
        where
            F: Fn($(Arc<$arg>),*) -> Result<T, E> + Send + Sync + 'static,
            T: Send + Sync + 'static,
            E: Into<BoxError>,
            $($arg: Send + Sync + 'static,)*
        {
            type Output = T;

            fn parameters() -> Vec<TypeKey> {
                vec![$(TypeKey::of::<$arg>()),*]
            }

            #[allow(unused_variables)]
            fn invoke(
                &self,
                resolver: &mut dyn Resolver,
            ) -> ContainerResult<Result<T, BoxError>> {
                $(let $param = resolver.object::<$arg>("")?;)*
                Ok((self)($($param),*).map_err(Into::into))
            }
        }

        impl<F, T, $($arg,)*> ConstructorFn<($($arg,)*)> for F
        where
            F: Fn($(Arc<$arg>),*) -> T + Send + Sync + 'static,
            T: Send + Sync + 'static,
            $($arg: Send + Sync + 'static,)*
        {
            type Output = T;

            fn parameters() -> Vec<TypeKey> {
                vec![$(TypeKey::of::<$arg>()),*]
            }

            #[allow(unused_variables)]
            fn invoke(&self, resolver: &mut dyn Resolver) -> ContainerResult<T> {
                $(let $param = resolver.object::<$arg>("")?;)*
                Ok((self)($($param),*))
            }
        }
    };
}

impl_factory_fn!();
impl_factory_fn!(a1: A1);
impl_factory_fn!(a1: A1, a2: A2);
impl_factory_fn!(a1: A1, a2: A2, a3: A3);
impl_factory_fn!(a1: A1, a2: A2, a3: A3, a4: A4);
impl_factory_fn!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5);
impl_factory_fn!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6);
impl_factory_fn!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7);
impl_factory_fn!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8);
