//! 元数据定义
//!
//! 提供类型信息以及类型擦除后的实例表示

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// 类型擦除后的服务实例
///
/// 内部保存的是契约类型 `C` 的 `Arc<C>`，`C` 可以是 `dyn Trait`。
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 将契约实例包装为类型擦除的实例
pub fn into_instance<C>(value: Arc<C>) -> Instance
where
    C: ?Sized + Send + Sync + 'static,
{
    Arc::new(value)
}

/// 从类型擦除的实例中取回契约实例
pub fn downcast_instance<C>(instance: &Instance) -> Option<Arc<C>>
where
    C: ?Sized + Send + Sync + 'static,
{
    instance.downcast_ref::<Arc<C>>().cloned()
}

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称（不含模块路径）
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整类型路径
    pub module_path: String,
}

impl TypeInfo {
    /// 创建新的类型信息
    pub fn new(type_id: TypeId, full_name: impl Into<String>) -> Self {
        let module_path = full_name.into();
        Self {
            name: short_type_name(&module_path),
            id: type_id,
            module_path,
        }
    }

    /// 从类型获取类型信息，支持 `dyn Trait`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        &self.name
    }

    /// 泛型定义的完整路径，例如 `repo::Repository<shop::Order>` 的定义为 `repo::Repository`
    ///
    /// 非泛型类型返回 `None`。
    pub fn generic_definition(&self) -> Option<&str> {
        let full = strip_dyn(&self.module_path);
        full.find('<').map(|index| full[..index].trim_end())
    }

    /// 是否为泛型实例
    pub fn is_generic(&self) -> bool {
        self.generic_definition().is_some()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn strip_dyn(name: &str) -> &str {
    name.trim().strip_prefix("dyn ").unwrap_or(name.trim())
}

/// 去掉类型名称中全部的模块路径
///
/// `dyn shop::contracts::Repository<shop::Order>` -> `Repository<Order>`
pub fn short_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut segment = String::new();

    let flush = |segment: &mut String, result: &mut String| {
        let trimmed = segment.trim();
        let without_dyn = trimmed.strip_prefix("dyn ").unwrap_or(trimmed);
        result.push_str(without_dyn.rsplit("::").next().unwrap_or(without_dyn));
        segment.clear();
    };

    for ch in full_name.chars() {
        match ch {
            '<' | '>' | ',' | '(' | ')' | '[' | ']' | ';' | '&' | '+' => {
                flush(&mut segment, &mut result);
                match ch {
                    ',' | ';' => {
                        result.push(ch);
                        result.push(' ');
                    }
                    '+' => result.push_str(" + "),
                    _ => result.push(ch),
                }
            }
            _ => segment.push(ch),
        }
    }
    flush(&mut segment, &mut result);

    result
}
