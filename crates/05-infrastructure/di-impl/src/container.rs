//! 默认服务容器
//!
//! 注册记录在构建后不可变。单例缓存在根容器，作用域实例缓存在各自的作用域
//! （根容器同时作为自己的作用域），瞬时实例每次新建。

use dashmap::DashMap;
use ioc_abstractions::{
    ResolveContext, ResolveOptions, ServiceDescriptor, ServiceImplementation, ServiceRegistry,
    ServiceResolver,
};
use ioc_common::{
    ConstructorDescriptor, DependencyError, DependencyResult, Instance, IocResult, Lifetime,
    ScopeInfo, TypeDescriptor, TypeInfo,
};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// 服务注册集合
#[derive(Debug, Clone, Default)]
pub struct ServiceCollection {
    descriptors: Vec<ServiceDescriptor>,
    options: ResolveOptions,
}

impl ServiceCollection {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置解析选项
    pub fn with_resolve_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl ServiceRegistry for ServiceCollection {
    fn add(&mut self, descriptor: ServiceDescriptor) {
        debug!(
            "添加注册: {} -> {:?} ({})",
            descriptor.contract, descriptor.implementation, descriptor.lifetime
        );
        self.descriptors.push(descriptor);
    }

    fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }

    fn build(&self) -> IocResult<Arc<dyn ServiceResolver>> {
        let provider = ServiceProvider::root(self.descriptors.clone(), self.options.clone());
        info!(
            "服务容器构建完成，共 {} 条注册，根作用域 {}",
            self.descriptors.len(),
            provider.scope.id
        );
        Ok(Arc::new(provider))
    }
}

/// 构建后共享的注册表
struct Registrations {
    descriptors: Vec<ServiceDescriptor>,
    by_contract: HashMap<TypeId, Vec<usize>>,
    options: ResolveOptions,
    singletons: DashMap<usize, Instance>,
    root_scope: ScopeInfo,
    root_scoped: Arc<DashMap<usize, Instance>>,
}

impl Registrations {
    fn indices(&self, contract: &TypeInfo) -> &[usize] {
        self.by_contract
            .get(&contract.id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// 服务提供者（根容器或子作用域）
pub struct ServiceProvider {
    registrations: Arc<Registrations>,
    scoped: Arc<DashMap<usize, Instance>>,
    scope: ScopeInfo,
}

impl ServiceProvider {
    /// 创建根容器
    pub fn root(descriptors: Vec<ServiceDescriptor>, options: ResolveOptions) -> Self {
        let mut by_contract: HashMap<TypeId, Vec<usize>> = HashMap::new();
        for (index, descriptor) in descriptors.iter().enumerate() {
            by_contract.entry(descriptor.contract.id).or_default().push(index);
        }

        let root_scope = ScopeInfo::root();
        let root_scoped = Arc::new(DashMap::new());
        let registrations = Arc::new(Registrations {
            descriptors,
            by_contract,
            options,
            singletons: DashMap::new(),
            root_scope: root_scope.clone(),
            root_scoped: root_scoped.clone(),
        });

        Self {
            registrations,
            scoped: root_scoped,
            scope: root_scope,
        }
    }

    /// 根容器视图，单例总是在根容器中激活
    fn root_view(&self) -> Self {
        Self {
            registrations: self.registrations.clone(),
            scoped: self.registrations.root_scoped.clone(),
            scope: self.registrations.root_scope.clone(),
        }
    }

    fn resolve_with(
        &self,
        contract: &TypeInfo,
        context: &mut ResolveContext,
    ) -> DependencyResult<Option<Instance>> {
        match self.registrations.indices(contract).last() {
            Some(&index) => self.instance_for(index, context).map(Some),
            None => Ok(None),
        }
    }

    fn instance_for(&self, index: usize, context: &mut ResolveContext) -> DependencyResult<Instance> {
        let descriptor = &self.registrations.descriptors[index];
        let implementation = match &descriptor.implementation {
            ServiceImplementation::Instance(instance) => return Ok(instance.clone()),
            ServiceImplementation::Type(implementation) => implementation,
        };

        match descriptor.lifetime {
            Lifetime::Transient => self.activate(descriptor, implementation, context),
            Lifetime::Scoped => self.cached(&self.scoped, index, implementation, context),
            Lifetime::Singleton => {
                let root = self.root_view();
                root.cached(&self.registrations.singletons, index, implementation, context)
            }
        }
    }

    fn cached(
        &self,
        cache: &DashMap<usize, Instance>,
        index: usize,
        implementation: &TypeDescriptor,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        if let Some(existing) = cache.get(&index) {
            return Ok(existing.value().clone());
        }

        let descriptor = &self.registrations.descriptors[index];

        // 激活期间不持有缓存锁，并发创建时以先写入的实例为准
        let created = self.activate(descriptor, implementation, context)?;
        Ok(cache.entry(index).or_insert(created).value().clone())
    }

    fn activate(
        &self,
        descriptor: &ServiceDescriptor,
        implementation: &TypeDescriptor,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        context.push_type(implementation.type_info())?;
        let constructed = self.construct(implementation, context);
        context.pop_type();

        let instance = constructed?;
        debug!(
            "激活 {} 作为 {} (作用域 {})",
            implementation.name(),
            descriptor.contract,
            self.scope.name
        );
        implementation
            .upcast_to(&descriptor.contract, &instance)
            .ok_or_else(|| DependencyError::ContractNotImplemented {
                implementation: implementation.name().to_string(),
                contract: descriptor.contract.short_name().to_string(),
            })
    }

    /// 按参数数量从多到少选择第一个参数全部已注册的构造函数
    fn construct(
        &self,
        implementation: &TypeDescriptor,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        let mut constructors: Vec<&ConstructorDescriptor> = implementation.constructors().iter().collect();
        if constructors.is_empty() {
            return Err(DependencyError::NoConstructor {
                type_name: implementation.name().to_string(),
            });
        }
        constructors.sort_by(|a, b| b.parameters().len().cmp(&a.parameters().len()));

        let mut missing = None;
        for constructor in constructors {
            if let Some(parameter) = constructor
                .parameters()
                .iter()
                .find(|parameter| self.registrations.indices(parameter).is_empty())
            {
                missing = Some(parameter.clone());
                continue;
            }

            let mut values = Vec::with_capacity(constructor.parameters().len());
            for parameter in constructor.parameters() {
                let value = self.resolve_with(parameter, context)?.ok_or_else(|| {
                    DependencyError::UnknownDependency {
                        type_name: parameter.short_name().to_string(),
                    }
                })?;
                values.push(value);
            }

            return constructor.invoke(values).map_err(|e| {
                DependencyError::creation_failed(implementation.name(), e)
            });
        }

        Err(DependencyError::UnknownDependency {
            type_name: missing
                .map(|parameter| parameter.short_name().to_string())
                .unwrap_or_else(|| implementation.name().to_string()),
        })
    }
}

impl ServiceResolver for ServiceProvider {
    fn get_service(&self, contract: &TypeInfo) -> DependencyResult<Option<Instance>> {
        let mut context = ResolveContext::new(self.registrations.options.clone());
        self.resolve_with(contract, &mut context)
    }

    fn get_services(&self, contract: &TypeInfo) -> DependencyResult<Vec<Instance>> {
        let mut context = ResolveContext::new(self.registrations.options.clone());
        self.registrations
            .indices(contract)
            .iter()
            .map(|&index| self.instance_for(index, &mut context))
            .collect()
    }

    fn is_registered(&self, contract: &TypeInfo) -> bool {
        !self.registrations.indices(contract).is_empty()
    }

    fn create_scope(&self) -> Arc<dyn ServiceResolver> {
        let scope = self.scope.child("scope");
        debug!("创建作用域 {} ({})", scope.name, scope.id);
        Arc::new(Self {
            registrations: self.registrations.clone(),
            scoped: Arc::new(DashMap::new()),
            scope,
        })
    }

    fn scope(&self) -> &ScopeInfo {
        &self.scope
    }
}
