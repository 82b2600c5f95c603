//! # IOC 组合层
//!
//! 负责把扫描选项、模块提供者与日志组合起来，启动基于约定的 IOC 引擎。
//!
//! ## 主要功能
//!
//! - **宿主构建器**: 使用构建者模式组装引擎
//! - **扫描选项加载**: 配置文件与 `IOC_` 前缀的环境变量
//! - **日志初始化**: 开发与生产两种预设
//! - **请求作用域**: 在独立作用域内运行异步任务
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use ioc_composition::{IocBuilder, LoggingConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let infrastructure = IocBuilder::new()
//!         .with_logging(LoggingConfig::development())
//!         .build()?;
//!
//!     for registration in infrastructure.registrations() {
//!         println!("{} -> {}", registration.contract, registration.implementation);
//!     }
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod infrastructure;

pub use builder::{IocBuilder, LoggingConfig};
pub use infrastructure::IocInfrastructure;

// 重新导出错误类型
pub use ioc_common::InfrastructureError;
