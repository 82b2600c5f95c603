//! # IOC 引擎实现
//!
//! 提供模块扫描、类型发现、约定注册与解析服务，以及默认的内存服务容器。
//!
//! ```rust
//! use ioc_engine::{add_ioc, ServiceCollection, StaticModuleProvider};
//! use std::sync::Arc;
//!
//! let mut services = ServiceCollection::new();
//! let provider = Arc::new(StaticModuleProvider::new());
//! let engine = add_ioc(&mut services, provider).expect("配置 IOC 引擎失败");
//! assert!(engine.is_configured());
//! ```

pub mod container;
pub mod engine;
pub mod extensions;
pub mod filter;
pub mod finder;
pub mod host;
pub mod image;
pub mod provider;
pub mod scope;

pub use container::{ServiceCollection, ServiceProvider};
pub use engine::Engine;
pub use extensions::{add_ioc, add_ioc_with};
pub use filter::PatternFilter;
pub use finder::ModuleTypeFinder;
pub use host::HostTypeFinder;
pub use image::{ModuleImage, FORMAT_VERSION, MAGIC};
pub use provider::StaticModuleProvider;
pub use scope::{sync_request_scope, with_request_scope, NoScopeAccessor, TaskLocalScopeAccessor};
