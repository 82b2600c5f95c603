//! 静态模块提供者
//!
//! 模块在编译期链接进程序，分为已加载和可加载两部分。

use ioc_abstractions::ModuleProvider;
use ioc_common::{DiscoveryError, DiscoveryResult, Module};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// 静态模块提供者
#[derive(Debug, Default)]
pub struct StaticModuleProvider {
    loaded: RwLock<Vec<Arc<dyn Module>>>,
    available: RwLock<Vec<Arc<dyn Module>>>,
}

impl StaticModuleProvider {
    /// 创建空提供者
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一个已加载的模块
    pub fn with_loaded(self, module: impl Module + 'static) -> Self {
        self.with_loaded_shared(Arc::new(module))
    }

    /// 添加一个共享的已加载模块
    pub fn with_loaded_shared(self, module: Arc<dyn Module>) -> Self {
        self.loaded.write().push(module);
        self
    }

    /// 添加一个可按名称加载、但尚未加载的模块
    pub fn with_available(self, module: impl Module + 'static) -> Self {
        self.available.write().push(Arc::new(module));
        self
    }

    /// 尚未加载的模块数量
    pub fn available_count(&self) -> usize {
        self.available.read().len()
    }
}

fn name_matches(module: &Arc<dyn Module>, name: &str) -> bool {
    module.full_name() == name || module.simple_name() == name
}

impl ModuleProvider for StaticModuleProvider {
    fn loaded_modules(&self) -> Vec<Arc<dyn Module>> {
        self.loaded.read().clone()
    }

    fn load(&self, name: &str) -> DiscoveryResult<Arc<dyn Module>> {
        if let Some(module) = self.find_loaded(name) {
            return Ok(module);
        }

        let module = {
            let mut available = self.available.write();
            let index = available
                .iter()
                .position(|module| name_matches(module, name))
                .ok_or_else(|| DiscoveryError::ModuleNotFound {
                    name: name.to_string(),
                })?;
            available.remove(index)
        };

        debug!("加载模块: {}", module.full_name());
        self.loaded.write().push(module.clone());
        Ok(module)
    }
}
