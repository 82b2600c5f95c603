//! 类型查找器抽象接口
//!
//! 在扫描到的模块中查找实现了指定能力的类型

use ioc_common::{CapabilityQuery, DiscoveryResult, Module, TypeDescriptor};
use std::sync::Arc;

/// 类型查找器 trait
pub trait TypeFinder: Send + Sync {
    /// 参与扫描的模块集合，按完整名称去重
    fn modules(&self) -> DiscoveryResult<Vec<Arc<dyn Module>>>;

    /// 在给定模块中查找实现了 `query` 的类型
    ///
    /// 结果按模块顺序累积，不去重。
    fn find_classes_of_type_in(
        &self,
        query: &CapabilityQuery,
        modules: &[Arc<dyn Module>],
        concrete_only: bool,
    ) -> DiscoveryResult<Vec<TypeDescriptor>>;

    /// 在全部模块中查找实现了 `query` 的类型
    fn find_classes_of_type(
        &self,
        query: &CapabilityQuery,
        concrete_only: bool,
    ) -> DiscoveryResult<Vec<TypeDescriptor>> {
        let modules = self.modules()?;
        self.find_classes_of_type_in(query, &modules, concrete_only)
    }
}

/// 类型查找器的类型化扩展
pub trait TypeFinderExt {
    /// 查找实现了 `C` 的具体类型
    fn find_classes_of<C: ?Sized + 'static>(&self) -> DiscoveryResult<Vec<TypeDescriptor>>;
}

impl<F: TypeFinder + ?Sized> TypeFinderExt for F {
    fn find_classes_of<C: ?Sized + 'static>(&self) -> DiscoveryResult<Vec<TypeDescriptor>> {
        self.find_classes_of_type(&CapabilityQuery::of::<C>(), true)
    }
}
