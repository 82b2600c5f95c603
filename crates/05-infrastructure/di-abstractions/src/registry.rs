//! 服务注册表抽象接口

use crate::resolver::ServiceResolver;
use ioc_common::{IocResult, Instance, Lifetime, TypeDescriptor, TypeInfo};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// 服务实现方式
#[derive(Clone)]
pub enum ServiceImplementation {
    /// 由容器按描述符构造
    Type(TypeDescriptor),
    /// 固定实例，内部为契约类型的 `Arc<C>`
    Instance(Instance),
}

impl ServiceImplementation {
    /// 实现类型名称，固定实例没有类型名称
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Type(descriptor) => Some(descriptor.name()),
            Self::Instance(_) => None,
        }
    }
}

impl fmt::Debug for ServiceImplementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(descriptor) => f.debug_tuple("Type").field(&descriptor.name()).finish(),
            Self::Instance(_) => f.write_str("Instance(<instance>)"),
        }
    }
}

/// 注册记录：(契约, 实现, 生命周期)
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// 契约类型
    pub contract: TypeInfo,
    /// 实现方式
    pub implementation: ServiceImplementation,
    /// 生命周期
    pub lifetime: Lifetime,
}

impl ServiceDescriptor {
    pub fn new(contract: TypeInfo, implementation: TypeDescriptor, lifetime: Lifetime) -> Self {
        Self {
            contract,
            implementation: ServiceImplementation::Type(implementation),
            lifetime,
        }
    }

    /// 固定实例注册，总是单例
    pub fn instance(contract: TypeInfo, instance: Instance) -> Self {
        Self {
            contract,
            implementation: ServiceImplementation::Instance(instance),
            lifetime: Lifetime::Singleton,
        }
    }

    /// 可序列化的注册摘要
    pub fn summary(&self) -> RegistrationSummary {
        RegistrationSummary {
            contract: self.contract.short_name().to_string(),
            implementation: self
                .implementation
                .type_name()
                .unwrap_or("<instance>")
                .to_string(),
            lifetime: self.lifetime,
        }
    }
}

/// 注册记录摘要，用于日志与展示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSummary {
    pub contract: String,
    pub implementation: String,
    pub lifetime: Lifetime,
}

/// 服务注册表 trait
///
/// 保存注册记录并构建出可解析的容器。不检查重复注册。
pub trait ServiceRegistry: Send + Sync {
    /// 添加一条注册记录
    fn add(&mut self, descriptor: ServiceDescriptor);

    /// 全部注册记录，按注册顺序排列
    fn descriptors(&self) -> &[ServiceDescriptor];

    /// 构建可解析的根容器
    fn build(&self) -> IocResult<Arc<dyn ServiceResolver>>;

    fn register_transient(&mut self, contract: TypeInfo, implementation: TypeDescriptor) {
        self.add(ServiceDescriptor::new(contract, implementation, Lifetime::Transient));
    }

    fn register_scoped(&mut self, contract: TypeInfo, implementation: TypeDescriptor) {
        self.add(ServiceDescriptor::new(contract, implementation, Lifetime::Scoped));
    }

    fn register_singleton(&mut self, contract: TypeInfo, implementation: TypeDescriptor) {
        self.add(ServiceDescriptor::new(contract, implementation, Lifetime::Singleton));
    }

    /// 按生命周期注册
    fn register(&mut self, contract: TypeInfo, implementation: TypeDescriptor, lifetime: Lifetime) {
        self.add(ServiceDescriptor::new(contract, implementation, lifetime));
    }

    /// 注册固定实例，`instance` 内部必须是契约类型的 `Arc<C>`
    fn register_instance(&mut self, contract: TypeInfo, instance: Instance) {
        self.add(ServiceDescriptor::instance(contract, instance));
    }

    /// 是否存在指定契约的注册
    fn is_registered(&self, contract: &TypeInfo) -> bool {
        self.descriptors()
            .iter()
            .any(|descriptor| descriptor.contract.id == contract.id)
    }
}
