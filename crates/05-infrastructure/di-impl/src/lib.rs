//! # 依赖注入具体实现
//!
//! 提供对象池、接口池、递归解析器以及容器的具体实现。
//!
//! ```ignore
//! let container = ContainerImpl::builder()
//!     .with_config_loader(Arc::new(LayeredConfigLoader::with_defaults()))
//!     .build();
//! container.register(Provider::injectable::<Server>(), RegisterOptions::new())?;
//! let server = container.get_object::<Server>("")?;
//! ```

pub mod container;
pub mod interface;
pub mod object;
pub mod resolver;

pub use container::*;
pub use interface::*;
pub use object::*;
pub use resolver::*;
