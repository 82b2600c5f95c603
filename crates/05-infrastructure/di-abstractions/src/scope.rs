//! 环境作用域访问接口

use crate::resolver::ServiceResolver;
use std::sync::Arc;

/// 环境作用域访问器
///
/// 处理请求时返回当前请求的作用域，否则返回 `None`，解析回落到根容器。
pub trait ScopeAccessor: Send + Sync {
    /// 当前活动的作用域
    fn current_scope(&self) -> Option<Arc<dyn ServiceResolver>>;
}
