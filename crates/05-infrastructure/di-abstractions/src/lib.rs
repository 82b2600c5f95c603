//! # IOC Abstractions
//!
//! IOC 引擎抽象层，定义引擎与外部协作者之间的接口。
//!
//! ## 核心接口
//!
//! - [`IocEngine`] - 引擎接口
//! - [`ServiceRegistry`] - 服务注册表接口
//! - [`ServiceResolver`] - 服务解析器接口
//! - [`ScopeAccessor`] - 环境作用域访问接口
//! - [`ModuleProvider`] - 模块提供者接口
//! - [`TypeFinder`] - 类型查找器接口

pub mod container;
pub mod discovery;
pub mod registry;
pub mod resolver;
pub mod scanner;
pub mod scope;

pub use container::*;
pub use discovery::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;
pub use scope::*;
