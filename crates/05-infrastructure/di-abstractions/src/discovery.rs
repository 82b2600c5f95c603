//! 模块提供者抽象接口
//!
//! 提供当前已加载的模块，并按名称加载更多模块

use ioc_common::{DiscoveryResult, Module};
use std::sync::Arc;

/// 模块提供者 trait
pub trait ModuleProvider: Send + Sync {
    /// 当前已加载的全部模块，按加载顺序排列
    fn loaded_modules(&self) -> Vec<Arc<dyn Module>>;

    /// 按完整名称或简单名称加载模块；已加载的模块直接返回
    ///
    /// 无法加载时返回 [`ioc_common::DiscoveryError::ModuleNotFound`]。
    fn load(&self, name: &str) -> DiscoveryResult<Arc<dyn Module>>;

    /// 在已加载模块中按完整名称或简单名称查找
    fn find_loaded(&self, name: &str) -> Option<Arc<dyn Module>> {
        self.loaded_modules()
            .into_iter()
            .find(|module| module.full_name() == name || module.simple_name() == name)
    }
}
