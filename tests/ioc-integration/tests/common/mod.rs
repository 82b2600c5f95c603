//! 集成测试共用的模块与类型
#![allow(dead_code)]

use ioc_common::{
    IocOptions, ModuleDescriptor, ScopedDependency, SingletonDependency, TransientDependency,
    TypeDescriptor,
};
use ioc_engine::{add_ioc_with, Engine, NoScopeAccessor, ServiceCollection, StaticModuleProvider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub mod contracts {
    pub trait Clock: Send + Sync {
        fn now(&self) -> u64;
    }

    pub trait PaymentGateway: Send + Sync {
        fn name(&self) -> &'static str;
    }

    pub trait OrderService: Send + Sync {
        fn place(&self, sku: &str) -> String;
    }

    pub trait RequestLog: Send + Sync {
        fn id(&self) -> usize;
    }

    pub trait Repository<T>: Send + Sync {
        fn table(&self) -> &'static str;
    }
}

pub struct Order;
pub struct Customer;

pub mod timing {
    pub struct Clock;

    impl super::contracts::Clock for Clock {
        fn now(&self) -> u64 {
            42
        }
    }
}

pub mod stripe {
    pub struct PaymentGateway;

    impl super::contracts::PaymentGateway for PaymentGateway {
        fn name(&self) -> &'static str {
            "stripe"
        }
    }
}

pub mod paypal {
    pub struct PaymentGateway;

    impl super::contracts::PaymentGateway for PaymentGateway {
        fn name(&self) -> &'static str {
            "paypal"
        }
    }
}

pub mod orders {
    use super::contracts;
    use std::sync::Arc;

    pub struct OrderService {
        pub gateway: Arc<dyn contracts::PaymentGateway>,
    }

    impl contracts::OrderService for OrderService {
        fn place(&self, sku: &str) -> String {
            format!("{sku} via {}", self.gateway.name())
        }
    }
}

pub mod audit {
    pub struct RequestLog {
        pub id: usize,
    }

    impl super::contracts::RequestLog for RequestLog {
        fn id(&self) -> usize {
            self.id
        }
    }
}

pub mod storage {
    use super::{contracts, Customer, Order};

    pub struct OrderRepository;

    impl contracts::Repository<Order> for OrderRepository {
        fn table(&self) -> &'static str {
            "orders"
        }
    }

    pub struct CustomerRepository;

    impl contracts::Repository<Customer> for CustomerRepository {
        fn table(&self) -> &'static str {
            "customers"
        }
    }
}

pub mod adyen {
    pub struct PaymentGateway;

    impl super::contracts::PaymentGateway for PaymentGateway {
        fn name(&self) -> &'static str {
            "adyen"
        }
    }
}

impl SingletonDependency for orders::OrderService {}
impl TransientDependency for stripe::PaymentGateway {}
impl TransientDependency for paypal::PaymentGateway {}
impl TransientDependency for adyen::PaymentGateway {}
impl ScopedDependency for audit::RequestLog {}
impl SingletonDependency for timing::Clock {}

static NEXT_LOG: AtomicUsize = AtomicUsize::new(0);

/// 下单相关的服务
pub fn orders_module() -> ModuleDescriptor {
    ModuleDescriptor::new("shop.orders, version=0.1.0")
        .with_type(TypeDescriptor::interface::<dyn contracts::OrderService>())
        .with_type(
            TypeDescriptor::concrete::<orders::OrderService>()
                .singleton()
                .implements::<dyn contracts::OrderService>(|service| service)
                .constructor1::<dyn contracts::PaymentGateway, _>(|gateway| {
                    orders::OrderService { gateway }
                }),
        )
        .with_type(
            TypeDescriptor::concrete::<stripe::PaymentGateway>()
                .transient()
                .implements::<dyn contracts::PaymentGateway>(|gateway| gateway)
                .constructor0(|| stripe::PaymentGateway),
        )
        .with_type(
            TypeDescriptor::concrete::<paypal::PaymentGateway>()
                .transient()
                .implements::<dyn contracts::PaymentGateway>(|gateway| gateway)
                .constructor0(|| paypal::PaymentGateway),
        )
}

/// 第三个网关，单独成模块
pub fn gateways_module() -> ModuleDescriptor {
    ModuleDescriptor::new("shop.gateways").with_type(
        TypeDescriptor::concrete::<adyen::PaymentGateway>()
            .transient()
            .implements::<dyn contracts::PaymentGateway>(|gateway| gateway)
            .constructor0(|| adyen::PaymentGateway),
    )
}

/// 请求日志（作用域）与存储仓库
pub fn infrastructure_module() -> ModuleDescriptor {
    ModuleDescriptor::new("shop.infrastructure")
        .with_type(
            TypeDescriptor::concrete::<audit::RequestLog>()
                .scoped()
                .implements::<dyn contracts::RequestLog>(|log| log)
                .constructor0(|| audit::RequestLog {
                    id: NEXT_LOG.fetch_add(1, Ordering::SeqCst),
                }),
        )
        .with_type(
            TypeDescriptor::concrete::<storage::OrderRepository>()
                .implements_generic::<dyn contracts::Repository<Order>>(|repository| repository)
                .constructor0(|| storage::OrderRepository),
        )
        .with_type(
            TypeDescriptor::concrete::<storage::CustomerRepository>()
                .implements_generic::<dyn contracts::Repository<Customer>>(|repository| repository)
                .constructor0(|| storage::CustomerRepository),
        )
}

/// 仅可按名称加载的计时模块
pub fn timing_module() -> ModuleDescriptor {
    ModuleDescriptor::new("billing.timing, version=2.0.0").with_type(
        TypeDescriptor::concrete::<timing::Clock>()
            .singleton()
            .implements::<dyn contracts::Clock>(|clock| clock)
            .constructor0(|| timing::Clock),
    )
}

pub fn provider() -> Arc<StaticModuleProvider> {
    Arc::new(
        StaticModuleProvider::new()
            .with_loaded(orders_module())
            .with_loaded(infrastructure_module())
            .with_available(timing_module()),
    )
}

/// 不扫描部署目录的默认选项
pub fn options() -> IocOptions {
    IocOptions::default().without_deployment_scan()
}

pub fn boot_with(
    provider: Arc<StaticModuleProvider>,
    options: IocOptions,
) -> anyhow::Result<(Arc<Engine>, ServiceCollection)> {
    let mut services = ServiceCollection::new();
    let engine = add_ioc_with(&mut services, provider, options, Arc::new(NoScopeAccessor))?;
    Ok((engine, services))
}

pub fn boot() -> (Arc<Engine>, ServiceCollection) {
    boot_with(provider(), options()).expect("启动失败")
}
