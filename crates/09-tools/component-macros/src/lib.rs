//! # Component Macros
//!
//! 这个 crate 提供了为对象生成依赖注入入口的过程宏。
//!
//! ## 核心宏
//!
//! - [`Injectable`] - 根据字段注解生成 `Injectable` 实现
//!
//! ## 使用示例
//!
//! ```ignore
//! use component_macros::Injectable;
//! use std::sync::Arc;
//!
//! #[derive(Injectable)]
//! pub struct OrderService {
//!     #[inject]
//!     repository: Arc<dyn OrderRepository>,
//!     #[inject(name = "primary")]
//!     database: Arc<Database>,
//!     #[inject(all = "^audit")]
//!     listeners: Vec<Arc<dyn OrderListener>>,
//!     #[value("orders.page_size")]
//!     page_size: usize,
//!     #[value("orders.region", optional)]
//!     region: String,
//! }
//! ```
//!
//! 生成的代码引用 `di_abstractions` 与 `infrastructure_common`，使用方需要依赖这两个 crate。

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod injectable;
mod utils;

/// 可注入对象派生宏
///
/// # 字段注解
///
/// - `#[inject]` - `Arc<T>` 字段按类型注入对象；`Arc<dyn Trait>` 字段注入接口的首个实现
/// - `#[inject(name = "alias")]` - 按别名注入对象
/// - `#[inject(all)]` / `#[inject(all = "regex")]` - `Vec<Arc<dyn Trait>>` 字段注入接口的全部实现，
///   可以用正则表达式过滤实现对象的别名
/// - `#[value("key")]` - 注入配置值，键不存在时解析失败
/// - `#[value("key", optional)]` - 键不存在时使用 `Default::default()`
///
/// 没有注解的字段使用 `Default::default()`。
#[proc_macro_derive(Injectable, attributes(inject, value))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
