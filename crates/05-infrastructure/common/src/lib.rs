//! # IOC Common
//!
//! 这个 crate 提供了基于约定的 IOC 引擎的公共类型。
//!
//! ## 核心组件
//!
//! - [`TypeDescriptor`] - 可被扫描的类型描述
//! - [`Module`] - 程序模块
//! - [`Lifetime`] - 生命周期及其标记 trait
//! - [`IocOptions`] - 扫描器配置
//! - [`infer_contract`] - 契约推断约定
//!
//! ## 设计原则
//!
//! - 没有运行时反射，类型通过描述符显式声明能力与构造函数
//! - 约定优于配置

pub mod configuration;
pub mod conventions;
pub mod descriptor;
pub mod errors;
pub mod lifecycle;
pub mod metadata;
pub mod module;

pub use configuration::*;
pub use conventions::*;
pub use descriptor::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
pub use module::*;
