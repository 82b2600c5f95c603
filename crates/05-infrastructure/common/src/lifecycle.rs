//! 组件生命周期定义

use crate::metadata::TypeInfo;
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::fmt;

/// 组件生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// 单例模式 - 整个容器生命周期内只创建一个实例
    Singleton,
    /// 作用域模式 - 在同一作用域内共享实例
    Scoped,
    /// 瞬时模式 - 每次请求都创建新实例
    Transient,
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::Transient
    }
}

impl Lifetime {
    /// 自动注册时评估生命周期标记的顺序
    pub const DISCOVERY_ORDER: [Lifetime; 3] =
        [Lifetime::Transient, Lifetime::Scoped, Lifetime::Singleton];

    /// 对应的生命周期标记 trait
    pub fn marker(self) -> TypeInfo {
        match self {
            Self::Transient => TypeInfo::of::<dyn TransientDependency>(),
            Self::Scoped => TypeInfo::of::<dyn ScopedDependency>(),
            Self::Singleton => TypeInfo::of::<dyn SingletonDependency>(),
        }
    }

    /// 根据标记 trait 的类型ID反查生命周期
    pub fn from_marker(id: TypeId) -> Option<Self> {
        Self::DISCOVERY_ORDER
            .into_iter()
            .find(|lifetime| lifetime.marker().id == id)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Singleton => "singleton",
            Self::Scoped => "scoped",
            Self::Transient => "transient",
        };
        f.write_str(name)
    }
}

/// 瞬时生命周期标记，声明后每次解析都创建新实例
pub trait TransientDependency: Send + Sync + 'static {}

/// 作用域生命周期标记，声明后在同一作用域内共享实例
pub trait ScopedDependency: Send + Sync + 'static {}

/// 单例生命周期标记，声明后在根容器内只创建一次
pub trait SingletonDependency: Send + Sync + 'static {}

/// 作用域信息
#[derive(Debug, Clone)]
pub struct ScopeInfo {
    pub id: uuid::Uuid,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ScopeInfo {
    /// 创建新作用域
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            name: name.into(),
            created_at: chrono::Utc::now(),
        }
    }

    /// 创建根作用域
    pub fn root() -> Self {
        Self::new("root")
    }

    /// 创建子作用域
    pub fn child(&self, name: impl Into<String>) -> Self {
        Self::new(format!("{}.{}", self.name, name.into()))
    }

    /// 是否为根作用域
    pub fn is_root(&self) -> bool {
        self.name == "root"
    }
}
