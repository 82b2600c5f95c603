//! IOC 引擎抽象接口
//!
//! 引擎在启动时扫描并注册类型，之后对外提供解析服务

use crate::registry::ServiceRegistry;
use crate::resolver::downcast;
use ioc_common::{
    downcast_instance, DependencyError, Injectable, Instance, IocError, IocResult, Module,
    TypeDescriptor, TypeInfo,
};
use std::sync::Arc;

/// IOC 引擎 trait
pub trait IocEngine: Send + Sync {
    /// 扫描模块，将带生命周期标记的类型注册到 `services`，随后构建容器
    ///
    /// 只能成功调用一次。
    fn configure_services(&self, services: &mut dyn ServiceRegistry) -> IocResult<()>;

    /// 解析契约的单个实例，优先使用当前环境作用域
    ///
    /// 未注册时返回 `Ok(None)`。
    fn resolve_by_type(&self, contract: &TypeInfo) -> IocResult<Option<Instance>>;

    /// 解析契约的全部实例
    fn resolve_all_by_type(&self, contract: &TypeInfo) -> IocResult<Vec<Instance>>;

    /// 构造一个未注册的类型
    ///
    /// 按声明顺序逐个尝试公开构造函数，返回的实例内部为具体类型的 `Arc<T>`。
    fn resolve_unregistered_descriptor(&self, descriptor: &TypeDescriptor) -> IocResult<Instance>;

    /// 按名称查找模块，先查已加载的模块，再查扫描到的模块集合
    fn find_module(&self, name: &str) -> Option<Arc<dyn Module>>;
}

/// IOC 引擎的类型化扩展
pub trait IocEngineExt {
    /// 解析 `C` 的单个实例
    fn resolve<C>(&self) -> IocResult<Option<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static;

    /// 解析 `C` 的全部实例
    fn resolve_all<C>(&self) -> IocResult<Vec<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static;

    /// 构造未注册的类型 `T`
    fn resolve_unregistered<T: Injectable>(&self) -> IocResult<Arc<T>>;
}

impl<E: IocEngine + ?Sized> IocEngineExt for E {
    fn resolve<C>(&self) -> IocResult<Option<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        Ok(self
            .resolve_by_type(&TypeInfo::of::<C>())?
            .map(|instance| downcast::<C>(&instance))
            .transpose()?)
    }

    fn resolve_all<C>(&self) -> IocResult<Vec<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let instances = self.resolve_all_by_type(&TypeInfo::of::<C>())?;
        Ok(instances
            .iter()
            .map(downcast::<C>)
            .collect::<Result<Vec<_>, _>>()?)
    }

    fn resolve_unregistered<T: Injectable>(&self) -> IocResult<Arc<T>> {
        let instance = self.resolve_unregistered_descriptor(&T::describe())?;
        downcast_instance::<T>(&instance).ok_or_else(|| {
            IocError::from(DependencyError::TypeMismatch {
                expected: std::any::type_name::<T>().to_string(),
            })
        })
    }
}
