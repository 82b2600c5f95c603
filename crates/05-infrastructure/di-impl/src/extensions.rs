//! 宿主注册入口

use crate::engine::Engine;
use crate::scope::TaskLocalScopeAccessor;
use ioc_abstractions::{IocEngine, ModuleProvider, ScopeAccessor, ServiceRegistry};
use ioc_common::{IocOptions, IocResult};
use std::sync::Arc;

/// 使用默认选项创建引擎并完成配置
///
/// 环境作用域取自 tokio 任务本地存储，见 [`crate::with_request_scope`]。
pub fn add_ioc(
    services: &mut dyn ServiceRegistry,
    provider: Arc<dyn ModuleProvider>,
) -> IocResult<Arc<Engine>> {
    add_ioc_with(
        services,
        provider,
        IocOptions::default(),
        Arc::new(TaskLocalScopeAccessor),
    )
}

/// 使用指定选项与作用域访问器创建引擎并完成配置
pub fn add_ioc_with(
    services: &mut dyn ServiceRegistry,
    provider: Arc<dyn ModuleProvider>,
    options: IocOptions,
    scope_accessor: Arc<dyn ScopeAccessor>,
) -> IocResult<Arc<Engine>> {
    let engine = Engine::new(provider, options, scope_accessor)?;
    engine.configure_services(services)?;
    Ok(engine)
}
