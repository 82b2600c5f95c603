//! 模块扫描、类型发现与约定注册

mod common;

use common::{boot, boot_with, contracts, options, provider, Order};
use ioc_abstractions::{IocEngine, IocEngineExt, ServiceRegistry, TypeFinder};
use ioc_common::{
    CapabilityQuery, DiscoveryError, IocError, IocOptions, Lifetime, ModuleDescriptor,
    TypeDescriptor, TypeInfo,
};
use ioc_engine::StaticModuleProvider;
use std::sync::Arc;

mod cache {
    pub struct Clock;

    impl super::contracts::Clock for Clock {
        fn now(&self) -> u64 {
            7
        }
    }

    impl ioc_common::SingletonDependency for Clock {}
    impl ioc_common::TransientDependency for Clock {}
}

#[test]
fn test_registration_table_follows_lifetime_order() {
    let (_, services) = boot();

    let table: Vec<(String, String, Lifetime)> = services
        .descriptors()
        .iter()
        .map(|descriptor| {
            let summary = descriptor.summary();
            (summary.contract, summary.implementation, summary.lifetime)
        })
        .collect();

    assert_eq!(
        table,
        vec![
            ("IocEngine".to_string(), "<instance>".to_string(), Lifetime::Singleton),
            ("TypeFinder".to_string(), "<instance>".to_string(), Lifetime::Singleton),
            ("PaymentGateway".to_string(), "PaymentGateway".to_string(), Lifetime::Transient),
            ("PaymentGateway".to_string(), "PaymentGateway".to_string(), Lifetime::Transient),
            ("RequestLog".to_string(), "RequestLog".to_string(), Lifetime::Scoped),
            ("OrderService".to_string(), "OrderService".to_string(), Lifetime::Singleton),
        ]
    );
}

#[test]
fn test_type_with_several_markers_is_registered_once() {
    let module = ModuleDescriptor::new("shop.cache").with_type(
        TypeDescriptor::concrete::<cache::Clock>()
            .singleton()
            .transient()
            .implements::<dyn contracts::Clock>(|clock| clock)
            .constructor0(|| cache::Clock),
    );
    let (engine, services) = boot_with(
        Arc::new(StaticModuleProvider::new().with_loaded(module)),
        options(),
    )
    .expect("启动失败");

    let clocks: Vec<_> = services
        .descriptors()
        .iter()
        .filter(|descriptor| descriptor.contract == TypeInfo::of::<dyn contracts::Clock>())
        .collect();
    assert_eq!(clocks.len(), 1);
    assert_eq!(clocks[0].lifetime, Lifetime::Transient);

    // 瞬时：每次解析都是新实例
    let first = engine.resolve::<dyn contracts::Clock>().expect("解析失败").expect("已注册");
    let second = engine.resolve::<dyn contracts::Clock>().expect("解析失败").expect("已注册");
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_unmarked_types_are_not_registered() {
    let (engine, services) = boot();

    assert!(!services.is_registered(&TypeInfo::of::<dyn contracts::Repository<Order>>()));
    assert!(engine
        .resolve::<dyn contracts::Repository<Order>>()
        .expect("未注册不是错误")
        .is_none());
}

#[test]
fn test_skip_pattern_wins_over_restrict_pattern() {
    let (engine, _) = boot_with(
        provider(),
        options()
            .with_restrict_pattern(r"^shop\.")
            .with_skip_pattern(r"^shop\.orders"),
    )
    .expect("启动失败");

    let modules: Vec<String> = engine
        .type_finder()
        .modules()
        .expect("扫描失败")
        .iter()
        .map(|module| module.full_name().to_string())
        .collect();
    assert_eq!(modules, vec!["shop.infrastructure".to_string()]);
    assert!(engine
        .resolve::<dyn contracts::OrderService>()
        .expect("解析失败")
        .is_none());
}

#[test]
fn test_configured_modules_are_loaded_by_name() {
    let provider = provider();
    let (engine, _) = boot_with(
        provider.clone(),
        options()
            .with_restrict_pattern(r"^shop\.")
            .with_module_names(["billing.timing"]),
    )
    .expect("启动失败");

    // 指定的模块不受名称模式约束
    let clock = engine
        .resolve::<dyn contracts::Clock>()
        .expect("解析失败")
        .expect("计时模块已加载");
    assert_eq!(clock.now(), 42);
    assert_eq!(provider.available_count(), 0);
    assert!(engine.find_module("billing.timing").is_some());
}

#[test]
fn test_missing_configured_module_fails_configuration() {
    let error = boot_with(provider(), options().with_module_names(["billing.ledger"]))
        .err()
        .expect("模块不存在");
    let error = error.downcast::<IocError>().expect("应为 IOC 错误");
    assert!(matches!(
        error,
        IocError::Discovery {
            source: DiscoveryError::ModuleNotFound { .. }
        }
    ));
}

#[test]
fn test_open_generic_query_finds_every_instantiation() {
    let (engine, _) = boot();

    let finder = engine
        .resolve::<dyn TypeFinder>()
        .expect("解析失败")
        .expect("TypeFinder 已注册");
    let query = CapabilityQuery::open_generic_of::<dyn contracts::Repository<()>>();
    let names: Vec<String> = finder
        .find_classes_of_type(&query, true)
        .expect("查找失败")
        .iter()
        .map(|descriptor| descriptor.name().to_string())
        .collect();
    assert_eq!(names, vec!["OrderRepository", "CustomerRepository"]);

    let exact = finder
        .find_classes_of_type(&CapabilityQuery::of::<dyn contracts::Repository<Order>>(), true)
        .expect("查找失败");
    assert_eq!(exact.len(), 1);
}

#[test]
fn test_metadata_failure_is_tolerated_unless_strict() {
    let broken = || {
        Arc::new(
            StaticModuleProvider::new()
                .with_loaded(common::orders_module())
                .with_loaded(ModuleDescriptor::new("shop.legacy").with_metadata_failure("缺少依赖程序集")),
        )
    };

    let (engine, _) = boot_with(broken(), options()).expect("宽松模式下应启动成功");
    assert!(engine
        .resolve::<dyn contracts::OrderService>()
        .expect("解析失败")
        .is_some());

    let error = boot_with(broken(), options().strict())
        .err()
        .expect("严格模式下应失败")
        .downcast::<IocError>()
        .expect("应为 IOC 错误");
    assert!(matches!(
        error,
        IocError::Discovery {
            source: DiscoveryError::TypeMetadata { .. }
        }
    ));
}

#[test]
fn test_loader_failure_always_aborts() {
    let provider = Arc::new(
        StaticModuleProvider::new().with_loaded(
            ModuleDescriptor::new("shop.reports")
                .with_loader_failure(["找不到类型 ReportRow", "找不到类型 ReportColumn"]),
        ),
    );

    let error = boot_with(provider, IocOptions::default().without_deployment_scan())
        .err()
        .expect("加载器错误总是致命的")
        .downcast::<IocError>()
        .expect("应为 IOC 错误");
    match error {
        IocError::Discovery {
            source: DiscoveryError::TypeLoadFailed { message },
        } => {
            assert!(message.contains("ReportRow"));
            assert!(message.contains("ReportColumn"));
        }
        other => panic!("意外的错误: {other}"),
    }
}

#[test]
fn test_engine_reports_itself() {
    let (engine, _) = boot();

    let resolved = engine
        .resolve::<dyn IocEngine>()
        .expect("解析失败")
        .expect("引擎已注册");
    assert!(resolved.find_module("shop.orders").is_some());
}
