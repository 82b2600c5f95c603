//! IOC 引擎
//!
//! 启动时扫描模块，把带生命周期标记的类型注册进服务容器；
//! 之后解析时优先使用环境作用域，没有作用域时使用根容器。

use crate::host::HostTypeFinder;
use ioc_abstractions::{
    IocEngine, ModuleProvider, ScopeAccessor, ServiceRegistry, ServiceResolver, TypeFinder,
};
use ioc_common::{
    infer_contract, into_instance, CapabilityQuery, ConstructorDescriptor, ConstructorFailure,
    DependencyError, Instance, IocError, IocOptions, IocResult, Lifetime, Module, TypeDescriptor,
    TypeInfo,
};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use tracing::{debug, info};

/// 单个构造函数的探测结果
enum ProbeOutcome {
    Constructed(Instance),
    Failed(DependencyError),
}

/// 基于约定的 IOC 引擎
///
/// 引擎把自己注册进容器，容器又由引擎持有，两者互相引用，生命周期与进程相同。
pub struct Engine {
    this: Weak<Engine>,
    provider: Arc<dyn ModuleProvider>,
    type_finder: Arc<HostTypeFinder>,
    scope_accessor: Arc<dyn ScopeAccessor>,
    root: OnceCell<Arc<dyn ServiceResolver>>,
}

impl Engine {
    /// 创建引擎，名称模式无效时返回错误
    pub fn new(
        provider: Arc<dyn ModuleProvider>,
        options: IocOptions,
        scope_accessor: Arc<dyn ScopeAccessor>,
    ) -> IocResult<Arc<Self>> {
        let type_finder = Arc::new(HostTypeFinder::new(provider.clone(), options)?);
        Ok(Arc::new_cyclic(|this| Self {
            this: this.clone(),
            provider,
            type_finder,
            scope_accessor,
            root: OnceCell::new(),
        }))
    }

    /// 引擎使用的类型查找器
    pub fn type_finder(&self) -> &Arc<HostTypeFinder> {
        &self.type_finder
    }

    /// 是否已完成配置
    pub fn is_configured(&self) -> bool {
        self.root.get().is_some()
    }

    /// 根容器
    pub fn root(&self) -> IocResult<&Arc<dyn ServiceResolver>> {
        self.root.get().ok_or(IocError::NotConfigured)
    }

    /// 当前用于解析的容器：环境作用域优先，否则为根容器
    pub fn current_resolver(&self) -> IocResult<Arc<dyn ServiceResolver>> {
        let root = self.root()?;
        Ok(self
            .scope_accessor
            .current_scope()
            .unwrap_or_else(|| root.clone()))
    }

    /// 按 Transient、Scoped、Singleton 的顺序注册发现的类型，返回注册数量
    ///
    /// 已在更早的生命周期中注册过的类型不再注册；同一轮中重复发现的类型照常注册。
    fn register_dependencies(&self, services: &mut dyn ServiceRegistry) -> IocResult<usize> {
        let modules = self.type_finder.modules()?;
        let mut earlier_passes = HashSet::new();
        let mut count = 0;

        for lifetime in Lifetime::DISCOVERY_ORDER {
            let query = CapabilityQuery::Exact(lifetime.marker());
            let implementations = self
                .type_finder
                .find_classes_of_type_in(&query, &modules, true)?;

            let mut this_pass = Vec::with_capacity(implementations.len());
            for implementation in implementations {
                let id = implementation.type_info().id;
                if earlier_passes.contains(&id) {
                    debug!("{} 已在更早的生命周期中注册，跳过 {}", implementation.name(), lifetime);
                    continue;
                }

                let contract = infer_contract(&implementation);
                debug!("注册 {} -> {} ({})", contract, implementation.name(), lifetime);
                services.register(contract, implementation, lifetime);
                this_pass.push(id);
                count += 1;
            }
            earlier_passes.extend(this_pass);
        }

        Ok(count)
    }

    /// 逐个解析构造函数参数，任一参数无法解析即失败
    fn probe(
        &self,
        resolver: &Arc<dyn ServiceResolver>,
        constructor: &ConstructorDescriptor,
    ) -> ProbeOutcome {
        let mut values = Vec::with_capacity(constructor.parameters().len());
        for parameter in constructor.parameters() {
            match resolver.get_service(parameter) {
                Ok(Some(value)) => values.push(value),
                Ok(None) => {
                    return ProbeOutcome::Failed(DependencyError::UnknownDependency {
                        type_name: parameter.short_name().to_string(),
                    })
                }
                Err(e) => return ProbeOutcome::Failed(e),
            }
        }

        match constructor.invoke(values) {
            Ok(instance) => ProbeOutcome::Constructed(instance),
            Err(e) => ProbeOutcome::Failed(e),
        }
    }
}

impl IocEngine for Engine {
    fn configure_services(&self, services: &mut dyn ServiceRegistry) -> IocResult<()> {
        if self.is_configured() {
            return Err(IocError::AlreadyConfigured);
        }
        info!("开始配置 IOC 引擎");

        let engine: Arc<dyn IocEngine> = self.this.upgrade().ok_or(IocError::NotConfigured)?;
        services.register_instance(TypeInfo::of::<dyn IocEngine>(), into_instance(engine));
        let finder: Arc<dyn TypeFinder> = self.type_finder.clone();
        services.register_instance(TypeInfo::of::<dyn TypeFinder>(), into_instance(finder));

        let registered = self.register_dependencies(services)?;
        let root = services.build()?;
        self.root
            .set(root)
            .map_err(|_| IocError::AlreadyConfigured)?;

        info!("IOC 引擎配置完成，自动注册 {} 个类型", registered);
        Ok(())
    }

    fn resolve_by_type(&self, contract: &TypeInfo) -> IocResult<Option<Instance>> {
        Ok(self.current_resolver()?.get_service(contract)?)
    }

    fn resolve_all_by_type(&self, contract: &TypeInfo) -> IocResult<Vec<Instance>> {
        Ok(self.current_resolver()?.get_services(contract)?)
    }

    fn resolve_unregistered_descriptor(&self, descriptor: &TypeDescriptor) -> IocResult<Instance> {
        let resolver = self.current_resolver()?;
        let mut attempts = Vec::new();
        let mut last_cause = None;

        for (index, constructor) in descriptor.constructors().iter().enumerate() {
            match self.probe(&resolver, constructor) {
                ProbeOutcome::Constructed(instance) => {
                    debug!("{} 使用构造函数 #{} {} 创建", descriptor.name(), index, constructor.signature());
                    return Ok(instance);
                }
                ProbeOutcome::Failed(cause) => {
                    debug!("{} 的构造函数 #{} 不可用: {}", descriptor.name(), index, cause);
                    attempts.push(ConstructorFailure {
                        index,
                        signature: constructor.signature(),
                        message: cause.to_string(),
                    });
                    last_cause = Some(cause);
                }
            }
        }

        let source = last_cause.unwrap_or_else(|| DependencyError::NoConstructor {
            type_name: descriptor.name().to_string(),
        });
        Err(IocError::ConstructionFailed {
            type_name: descriptor.name().to_string(),
            attempts,
            source: Box::new(source),
        })
    }

    fn find_module(&self, name: &str) -> Option<Arc<dyn Module>> {
        if let Some(module) = self.provider.find_loaded(name) {
            return Some(module);
        }
        self.type_finder
            .modules()
            .ok()?
            .into_iter()
            .find(|module| module.full_name() == name || module.simple_name() == name)
    }
}
