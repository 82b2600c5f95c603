//! 约定规范定义
//!
//! 自动注册时按命名约定推断契约类型

use crate::descriptor::TypeDescriptor;
use crate::lifecycle::Lifetime;
use crate::metadata::TypeInfo;

/// 是否为生命周期标记 trait
pub fn is_lifetime_marker(type_info: &TypeInfo) -> bool {
    Lifetime::from_marker(type_info.id).is_some()
}

/// 推断实现类型注册时使用的契约
///
/// 按声明顺序取第一个简短名称以实现类型简短名称结尾的能力（生命周期标记除外）；
/// 没有匹配时以实现类型自身作为契约。
pub fn infer_contract(descriptor: &TypeDescriptor) -> TypeInfo {
    let implementation = descriptor.name();
    descriptor
        .capabilities()
        .iter()
        .map(|binding| binding.contract())
        .filter(|contract| !is_lifetime_marker(contract))
        .find(|contract| contract.short_name().ends_with(implementation))
        .cloned()
        .unwrap_or_else(|| descriptor.type_info().clone())
}
