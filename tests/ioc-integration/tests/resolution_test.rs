//! 注册服务的解析与未注册类型的按需构造

mod common;

use common::{boot, boot_with, contracts, gateways_module, options, orders_module, Order};
use ioc_abstractions::IocEngineExt;
use ioc_common::{
    DependencyError, Injectable, IocError, ModuleDescriptor, TypeDescriptor, TypeInfo,
};
use ioc_engine::StaticModuleProvider;
use std::sync::Arc;

/// 优先使用时钟，没有时钟时退回只依赖网关的构造函数
struct ReceiptPrinter {
    header: String,
}

impl Injectable for ReceiptPrinter {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::concrete::<ReceiptPrinter>()
            .constructor2::<dyn contracts::Clock, dyn contracts::PaymentGateway, _>(
                |clock, gateway| ReceiptPrinter {
                    header: format!("{} @ {}", gateway.name(), clock.now()),
                },
            )
            .constructor1::<dyn contracts::PaymentGateway, _>(|gateway| ReceiptPrinter {
                header: gateway.name().to_string(),
            })
            .build()
    }
}

/// 两个构造函数的依赖都未注册
struct ReportExporter;

impl Injectable for ReportExporter {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::concrete::<ReportExporter>()
            .constructor1::<dyn contracts::Clock, _>(|_| ReportExporter)
            .constructor1::<dyn contracts::Repository<Order>, _>(|_| ReportExporter)
            .build()
    }
}

/// 没有构造函数
struct Unconstructible;

impl Injectable for Unconstructible {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::concrete::<Unconstructible>().build()
    }
}

/// 第一个构造函数自身报错
struct FlakyReport {
    source: &'static str,
}

impl Injectable for FlakyReport {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::concrete::<FlakyReport>()
            .constructor(
                vec![TypeInfo::of::<dyn contracts::OrderService>()],
                |_| Err(DependencyError::creation_failed("FlakyReport", "连接已关闭")),
            )
            .constructor0(|| FlakyReport { source: "fallback" })
            .build()
    }
}

mod ports {
    pub trait Left: Send + Sync {}
    pub trait Right: Send + Sync {}
}

mod cycle {
    use super::ports;
    use std::sync::Arc;

    pub struct Left {
        pub _right: Arc<dyn ports::Right>,
    }
    impl ports::Left for Left {}

    pub struct Right {
        pub _left: Arc<dyn ports::Left>,
    }
    impl ports::Right for Right {}

    impl ioc_common::TransientDependency for Left {}
    impl ioc_common::TransientDependency for Right {}
}

#[test]
fn test_singleton_and_transient_identity() {
    let (engine, _) = boot();

    let first = engine
        .resolve::<dyn contracts::OrderService>()
        .expect("解析失败")
        .expect("已注册");
    let second = engine
        .resolve::<dyn contracts::OrderService>()
        .expect("解析失败")
        .expect("已注册");
    assert!(Arc::ptr_eq(&first, &second));

    let a = engine
        .resolve::<dyn contracts::PaymentGateway>()
        .expect("解析失败")
        .expect("已注册");
    let b = engine
        .resolve::<dyn contracts::PaymentGateway>()
        .expect("解析失败")
        .expect("已注册");
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn test_order_service_uses_last_registered_gateway() {
    let (engine, _) = boot();

    let orders = engine
        .resolve::<dyn contracts::OrderService>()
        .expect("解析失败")
        .expect("已注册");
    assert_eq!(orders.place("显示器"), "显示器 via paypal");

    let names: Vec<&'static str> = engine
        .resolve_all::<dyn contracts::PaymentGateway>()
        .expect("解析失败")
        .iter()
        .map(|gateway| gateway.name())
        .collect();
    assert_eq!(names, vec!["stripe", "paypal"]);
}

#[test]
fn test_resolve_all_returns_distinct_instances_for_every_registration() {
    let provider = Arc::new(
        StaticModuleProvider::new()
            .with_loaded(orders_module())
            .with_loaded(gateways_module()),
    );
    let (engine, _) = boot_with(provider, options()).expect("启动失败");

    let gateways = engine
        .resolve_all::<dyn contracts::PaymentGateway>()
        .expect("解析失败");
    let names: Vec<&'static str> = gateways.iter().map(|gateway| gateway.name()).collect();
    assert_eq!(names, vec!["stripe", "paypal", "adyen"]);

    for (i, first) in gateways.iter().enumerate() {
        for second in &gateways[i + 1..] {
            assert!(!Arc::ptr_eq(first, second));
        }
    }

    // 瞬时注册每次解析都得到新实例
    let again = engine
        .resolve_all::<dyn contracts::PaymentGateway>()
        .expect("解析失败");
    assert!(gateways
        .iter()
        .zip(&again)
        .all(|(first, second)| !Arc::ptr_eq(first, second)));
}

#[test]
fn test_resolve_all_of_unregistered_contract_is_empty() {
    let (engine, _) = boot();

    assert!(engine
        .resolve_all::<dyn contracts::Clock>()
        .expect("解析失败")
        .is_empty());
}

#[test]
fn test_first_satisfiable_constructor_is_used() {
    let (engine, _) = boot();

    let printer = engine
        .resolve_unregistered::<ReceiptPrinter>()
        .expect("第二个构造函数可用");
    assert_eq!(printer.header, "paypal");
}

#[test]
fn test_all_constructors_failing_reports_every_attempt() {
    let (engine, _) = boot();

    let error = engine
        .resolve_unregistered::<ReportExporter>()
        .err()
        .expect("没有可用的构造函数");
    match error {
        IocError::ConstructionFailed {
            type_name,
            attempts,
            source,
        } => {
            assert_eq!(type_name, "ReportExporter");
            assert_eq!(attempts.len(), 2);
            assert_eq!(attempts[0].signature, "(Clock)");
            assert_eq!(attempts[1].signature, "(Repository<Order>)");
            match *source {
                DependencyError::UnknownDependency { type_name } => {
                    assert_eq!(type_name, "Repository<Order>");
                }
                other => panic!("意外的失败原因: {other}"),
            }
        }
        other => panic!("意外的错误: {other}"),
    }
}

#[test]
fn test_type_without_constructors_cannot_be_built() {
    let (engine, _) = boot();

    match engine.resolve_unregistered::<Unconstructible>() {
        Err(IocError::ConstructionFailed {
            attempts, source, ..
        }) => {
            assert!(attempts.is_empty());
            assert!(matches!(*source, DependencyError::NoConstructor { .. }));
        }
        Err(other) => panic!("意外的错误: {other}"),
        Ok(_) => panic!("不应构造成功"),
    }
}

#[test]
fn test_constructor_error_moves_on_to_next_constructor() {
    let (engine, _) = boot();

    let report = engine
        .resolve_unregistered::<FlakyReport>()
        .expect("无参构造函数可用");
    assert_eq!(report.source, "fallback");
}

#[test]
fn test_circular_registration_is_reported() {
    let module = ModuleDescriptor::new("shop.cycle")
        .with_type(
            TypeDescriptor::concrete::<cycle::Left>()
                .transient()
                .implements::<dyn ports::Left>(|left| left)
                .constructor1::<dyn ports::Right, _>(|right| cycle::Left { _right: right }),
        )
        .with_type(
            TypeDescriptor::concrete::<cycle::Right>()
                .transient()
                .implements::<dyn ports::Right>(|right| right)
                .constructor1::<dyn ports::Left, _>(|left| cycle::Right { _left: left }),
        );
    let (engine, _) = boot_with(
        Arc::new(StaticModuleProvider::new().with_loaded(module)),
        options(),
    )
    .expect("启动失败");

    let error = engine
        .resolve::<dyn ports::Left>()
        .err()
        .expect("循环依赖");
    match error {
        IocError::Dependency {
            source: DependencyError::CircularDependency { dependency_chain },
        } => {
            assert_eq!(dependency_chain, "Left -> Right -> Left");
        }
        other => panic!("意外的错误: {other}"),
    }
}
