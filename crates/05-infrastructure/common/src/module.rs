//! 程序模块定义

use crate::descriptor::TypeDescriptor;
use std::fmt;
use thiserror::Error;

/// 枚举模块类型时的失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeLoadError {
    /// 类型元数据不可读，扫描时默认跳过该模块
    #[error("类型元数据不可读: {message}")]
    Metadata { message: String },

    /// 加载器级别的失败，总是中止扫描
    #[error("类型加载器失败: {}", .causes.join("; "))]
    Loader { causes: Vec<String> },
}

/// 程序模块
///
/// 对应一个 crate 或者一个可部署的组件单元。模块身份由完整名称决定。
pub trait Module: Send + Sync + fmt::Debug {
    /// 完整名称，例如 `billing, version=1.2.0`
    fn full_name(&self) -> &str;

    /// 简单名称，即完整名称中第一个逗号之前的部分
    fn simple_name(&self) -> &str {
        simple_name(self.full_name())
    }

    /// 枚举模块中的全部类型
    fn types(&self) -> Result<Vec<TypeDescriptor>, TypeLoadError>;
}

/// 从完整名称中取出简单名称
pub fn simple_name(full_name: &str) -> &str {
    full_name
        .split(',')
        .next()
        .map_or(full_name, str::trim)
}

/// 内存中的模块描述
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    full_name: String,
    types: Vec<TypeDescriptor>,
    failure: Option<TypeLoadError>,
}

impl ModuleDescriptor {
    /// 创建空模块
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            types: Vec::new(),
            failure: None,
        }
    }

    /// 添加一个类型
    pub fn with_type(mut self, descriptor: impl Into<TypeDescriptor>) -> Self {
        self.types.push(descriptor.into());
        self
    }

    /// 批量添加类型
    pub fn with_types<I>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        self.types.extend(descriptors);
        self
    }

    /// 模拟元数据不可读的模块
    pub fn with_metadata_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(TypeLoadError::Metadata {
            message: message.into(),
        });
        self
    }

    /// 模拟加载器失败的模块
    pub fn with_loader_failure<I, S>(mut self, causes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failure = Some(TypeLoadError::Loader {
            causes: causes.into_iter().map(Into::into).collect(),
        });
        self
    }
}

impl Module for ModuleDescriptor {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn types(&self) -> Result<Vec<TypeDescriptor>, TypeLoadError> {
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(self.types.clone()),
        }
    }
}
