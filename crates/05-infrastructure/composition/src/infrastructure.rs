//! IOC 宿主

use crate::builder::IocBuilder;
use chrono::{DateTime, Utc};
use ioc_abstractions::{IocEngine, RegistrationSummary, ServiceRegistry, ServiceResolver};
use ioc_common::IocResult;
use ioc_engine::{with_request_scope, Engine, ServiceCollection};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// 启动完成的 IOC 宿主
///
/// 持有已配置的引擎与启动时的注册表快照。
pub struct IocInfrastructure {
    /// 引擎
    engine: Arc<Engine>,
    /// 注册摘要，按注册顺序排列
    registrations: Vec<RegistrationSummary>,
    /// 启动时间
    started_at: DateTime<Utc>,
}

impl IocInfrastructure {
    /// 创建宿主构建器
    pub fn builder() -> IocBuilder {
        IocBuilder::new()
    }

    pub(crate) fn new(engine: Arc<Engine>, services: &ServiceCollection) -> Self {
        Self {
            engine,
            registrations: services
                .descriptors()
                .iter()
                .map(|descriptor| descriptor.summary())
                .collect(),
            started_at: Utc::now(),
        }
    }

    /// 引擎
    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// 引擎的抽象视图
    pub fn ioc(&self) -> Arc<dyn IocEngine> {
        self.engine.clone()
    }

    pub fn registrations(&self) -> &[RegistrationSummary] {
        &self.registrations
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// 创建新的请求作用域
    pub fn create_scope(&self) -> IocResult<Arc<dyn ServiceResolver>> {
        let scope = self.engine.root()?.create_scope();
        debug!("创建请求作用域: {}", scope.scope().id);
        Ok(scope)
    }

    /// 在新的请求作用域内执行异步任务
    ///
    /// 任务内通过引擎解析的服务都来自该作用域。
    pub async fn run_scoped<F>(&self, future: F) -> IocResult<F::Output>
    where
        F: Future,
    {
        let scope = self.create_scope()?;
        Ok(with_request_scope(scope, future).await)
    }
}
