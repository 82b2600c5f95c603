//! 环境作用域与组合层启动

mod common;

use common::{contracts, infrastructure_module, orders_module, options};
use ioc_abstractions::IocEngineExt;
use ioc_composition::IocBuilder;
use ioc_engine::{with_request_scope, TaskLocalScopeAccessor};
use std::sync::Arc;

fn boot() -> ioc_composition::IocInfrastructure {
    IocBuilder::new()
        .with_options(options())
        .add_module(orders_module())
        .add_module(infrastructure_module())
        .with_scope_accessor(Arc::new(TaskLocalScopeAccessor))
        .build()
        .expect("启动失败")
}

fn request_log_id(engine: &ioc_engine::Engine) -> usize {
    engine
        .resolve::<dyn contracts::RequestLog>()
        .expect("解析失败")
        .expect("已注册")
        .id()
}

#[tokio::test]
async fn test_scoped_service_is_shared_within_a_request() {
    let infrastructure = boot();
    let engine = infrastructure.engine().clone();

    let scope = infrastructure.create_scope().expect("已配置");
    let (first, second) = with_request_scope(scope, async {
        (request_log_id(&engine), request_log_id(&engine))
    })
    .await;
    assert_eq!(first, second);

    let scope = infrastructure.create_scope().expect("已配置");
    let other = with_request_scope(scope, async { request_log_id(&engine) }).await;
    assert_ne!(first, other);
}

#[tokio::test]
async fn test_concurrent_requests_get_their_own_scope() {
    let infrastructure = boot();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let engine = infrastructure.engine().clone();
        let scope = infrastructure.create_scope().expect("已配置");
        handles.push(tokio::spawn(with_request_scope(scope, async move {
            let first = request_log_id(&engine);
            tokio::task::yield_now().await;
            (first, request_log_id(&engine))
        })));
    }

    let mut ids = Vec::new();
    for handle in handles {
        let (first, second) = handle.await.expect("任务失败");
        assert_eq!(first, second);
        ids.push(first);
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[tokio::test]
async fn test_outside_a_request_the_root_scope_is_used() {
    let infrastructure = boot();
    let engine = infrastructure.engine().clone();

    // 根容器充当自己的作用域
    assert_eq!(request_log_id(&engine), request_log_id(&engine));

    let scoped = infrastructure
        .run_scoped(async { request_log_id(&engine) })
        .await
        .expect("已配置");
    assert_ne!(scoped, request_log_id(&engine));
}

#[tokio::test]
async fn test_singletons_are_shared_across_scopes() {
    let infrastructure = boot();
    let engine = infrastructure.engine().clone();

    let root = engine
        .resolve::<dyn contracts::OrderService>()
        .expect("解析失败")
        .expect("已注册");
    let scoped = infrastructure
        .run_scoped(async {
            engine
                .resolve::<dyn contracts::OrderService>()
                .expect("解析失败")
                .expect("已注册")
        })
        .await
        .expect("已配置");
    assert!(Arc::ptr_eq(&root, &scoped));
}
