//! 环境作用域访问器
//!
//! 请求作用域保存在 tokio 任务本地存储中，处理请求的代码通过
//! [`with_request_scope`] 进入作用域。

use ioc_abstractions::{ScopeAccessor, ServiceResolver};
use std::future::Future;
use std::sync::Arc;

tokio::task_local! {
    static REQUEST_SCOPE: Arc<dyn ServiceResolver>;
}

/// 没有环境作用域，解析总是使用根容器
#[derive(Debug, Default, Clone, Copy)]
pub struct NoScopeAccessor;

impl ScopeAccessor for NoScopeAccessor {
    fn current_scope(&self) -> Option<Arc<dyn ServiceResolver>> {
        None
    }
}

/// 读取当前任务的请求作用域
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskLocalScopeAccessor;

impl ScopeAccessor for TaskLocalScopeAccessor {
    fn current_scope(&self) -> Option<Arc<dyn ServiceResolver>> {
        REQUEST_SCOPE.try_with(Arc::clone).ok()
    }
}

/// 在 `scope` 作用域内执行异步任务
pub async fn with_request_scope<F>(scope: Arc<dyn ServiceResolver>, future: F) -> F::Output
where
    F: Future,
{
    REQUEST_SCOPE.scope(scope, future).await
}

/// 在 `scope` 作用域内执行同步代码
pub fn sync_request_scope<R>(scope: Arc<dyn ServiceResolver>, f: impl FnOnce() -> R) -> R {
    REQUEST_SCOPE.sync_scope(scope, f)
}
