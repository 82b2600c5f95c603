//! 模块扫描与类型发现

use crate::filter::PatternFilter;
use ioc_abstractions::{ModuleProvider, TypeFinder};
use ioc_common::{
    CapabilityQuery, DiscoveryError, DiscoveryResult, IocOptions, Module, TypeDescriptor,
    TypeLoadError,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// 基于已加载模块的类型查找器
///
/// 模块集合依次由已加载模块（经过名称过滤）和配置的模块名称组成，按完整名称去重。
pub struct ModuleTypeFinder {
    provider: Arc<dyn ModuleProvider>,
    filter: PatternFilter,
    options: IocOptions,
}

impl ModuleTypeFinder {
    /// 创建类型查找器，名称模式无效时返回错误
    pub fn new(provider: Arc<dyn ModuleProvider>, options: IocOptions) -> DiscoveryResult<Self> {
        let filter = PatternFilter::from_options(&options)?;
        Ok(Self {
            provider,
            filter,
            options,
        })
    }

    pub fn provider(&self) -> &Arc<dyn ModuleProvider> {
        &self.provider
    }

    pub fn options(&self) -> &IocOptions {
        &self.options
    }

    /// 模块名称是否通过过滤
    pub fn matches(&self, module_name: &str) -> bool {
        self.filter.matches(module_name)
    }

    fn add_loaded_modules(&self, seen: &mut HashSet<String>, modules: &mut Vec<Arc<dyn Module>>) {
        for module in self.provider.loaded_modules() {
            if self.matches(module.full_name()) && seen.insert(module.full_name().to_string()) {
                modules.push(module);
            }
        }
    }

    fn add_configured_modules(
        &self,
        seen: &mut HashSet<String>,
        modules: &mut Vec<Arc<dyn Module>>,
    ) -> DiscoveryResult<()> {
        for name in &self.options.module_names {
            let module = self.provider.load(name)?;
            if seen.insert(module.full_name().to_string()) {
                modules.push(module);
            }
        }
        Ok(())
    }

    /// 枚举单个模块的类型；元数据错误按配置跳过，加载器错误总是返回
    fn module_types(&self, module: &Arc<dyn Module>) -> DiscoveryResult<Option<Vec<TypeDescriptor>>> {
        match module.types() {
            Ok(types) => Ok(Some(types)),
            Err(TypeLoadError::Metadata { message }) if self.options.ignore_reflection_errors => {
                warn!("跳过类型元数据不可读的模块 {}: {}", module.full_name(), message);
                Ok(None)
            }
            Err(TypeLoadError::Metadata { message }) => Err(DiscoveryError::TypeMetadata {
                module: module.full_name().to_string(),
                message,
            }),
            Err(TypeLoadError::Loader { causes }) => {
                let mut message = String::new();
                for cause in causes {
                    message.push_str(&cause);
                    message.push('\n');
                }
                Err(DiscoveryError::TypeLoadFailed { message })
            }
        }
    }
}

impl TypeFinder for ModuleTypeFinder {
    fn modules(&self) -> DiscoveryResult<Vec<Arc<dyn Module>>> {
        let mut seen = HashSet::new();
        let mut modules = Vec::new();

        if self.options.load_app_domain_modules {
            self.add_loaded_modules(&mut seen, &mut modules);
        }
        self.add_configured_modules(&mut seen, &mut modules)?;

        debug!("扫描模块集合共 {} 个模块", modules.len());
        Ok(modules)
    }

    fn find_classes_of_type_in(
        &self,
        query: &CapabilityQuery,
        modules: &[Arc<dyn Module>],
        concrete_only: bool,
    ) -> DiscoveryResult<Vec<TypeDescriptor>> {
        let mut result = Vec::new();

        for module in modules {
            let Some(types) = self.module_types(module)? else {
                continue;
            };

            for descriptor in types {
                if descriptor.is_interface() || query.is_query_type(&descriptor) {
                    continue;
                }
                if !query.is_declared_by(&descriptor) {
                    continue;
                }
                if concrete_only && !descriptor.is_concrete() {
                    continue;
                }
                debug!("发现类型 {} 实现了 {}", descriptor.name(), query);
                result.push(descriptor);
            }
        }

        Ok(result)
    }
}
