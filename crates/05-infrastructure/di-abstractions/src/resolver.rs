//! 服务解析器抽象接口
//!
//! 提供依赖解析和作用域管理的能力

use ioc_common::{downcast_instance, DependencyError, DependencyResult, Instance, ScopeInfo, TypeInfo};
use std::sync::Arc;

/// 服务解析器 trait
///
/// 根容器和每个作用域都是一个解析器。
pub trait ServiceResolver: Send + Sync {
    /// 解析契约的单个实例，取最后注册的实现
    ///
    /// 契约未注册时返回 `Ok(None)`；已注册但激活失败时返回错误。
    fn get_service(&self, contract: &TypeInfo) -> DependencyResult<Option<Instance>>;

    /// 解析契约的全部实例，按注册顺序排列
    fn get_services(&self, contract: &TypeInfo) -> DependencyResult<Vec<Instance>>;

    /// 契约是否已注册
    fn is_registered(&self, contract: &TypeInfo) -> bool;

    /// 创建子作用域
    fn create_scope(&self) -> Arc<dyn ServiceResolver>;

    /// 当前作用域信息
    fn scope(&self) -> &ScopeInfo;
}

/// 服务解析器的类型化扩展
pub trait ServiceResolverExt {
    /// 解析 `C` 的单个实例
    fn get<C>(&self) -> DependencyResult<Option<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static;

    /// 解析 `C` 的全部实例
    fn get_all<C>(&self) -> DependencyResult<Vec<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static;
}

impl<R: ServiceResolver + ?Sized> ServiceResolverExt for R {
    fn get<C>(&self) -> DependencyResult<Option<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.get_service(&TypeInfo::of::<C>())?
            .map(|instance| downcast::<C>(&instance))
            .transpose()
    }

    fn get_all<C>(&self) -> DependencyResult<Vec<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.get_services(&TypeInfo::of::<C>())?
            .iter()
            .map(downcast::<C>)
            .collect()
    }
}

/// 将实例还原为契约类型，失败时返回类型不匹配错误
pub fn downcast<C>(instance: &Instance) -> DependencyResult<Arc<C>>
where
    C: ?Sized + Send + Sync + 'static,
{
    downcast_instance::<C>(instance).ok_or_else(|| DependencyError::TypeMismatch {
        expected: std::any::type_name::<C>().to_string(),
    })
}

/// 解析上下文
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    pub resolution_chain: Vec<TypeInfo>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 添加类型到解析链
    pub fn push_type(&mut self, type_info: &TypeInfo) -> DependencyResult<()> {
        if self
            .resolution_chain
            .iter()
            .any(|existing| existing.id == type_info.id)
        {
            return Err(DependencyError::CircularDependency {
                dependency_chain: self.describe_chain(type_info),
            });
        }
        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::MaxDepthExceeded {
                type_name: type_info.short_name().to_string(),
                max_depth: self.options.max_depth,
            });
        }
        self.resolution_chain.push(type_info.clone());
        Ok(())
    }

    /// 从解析链中移除类型
    pub fn pop_type(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    fn describe_chain(&self, next: &TypeInfo) -> String {
        self.resolution_chain
            .iter()
            .chain(std::iter::once(next))
            .map(TypeInfo::short_name)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}
