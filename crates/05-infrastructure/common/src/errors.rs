//! 错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 模块与类型发现错误
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("模块不存在: {name}")]
    ModuleNotFound { name: String },

    #[error("模块 {module} 的类型元数据读取失败: {message}")]
    TypeMetadata { module: String, message: String },

    /// 加载器级别的失败，消息中逐行拼接了全部底层原因
    #[error("类型加载失败:\n{message}")]
    TypeLoadFailed { message: String },

    #[error("模块映像格式错误: {}, 原因: {reason}", .path.display())]
    BadImageFormat { path: PathBuf, reason: String },

    #[error("读取部署目录失败: {}, 原因: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("名称模式无效: {pattern}, 原因: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("未知依赖: {type_name}")]
    UnknownDependency { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("解析深度超过上限 {max_depth}: {type_name}")]
    MaxDepthExceeded { type_name: String, max_depth: usize },

    #[error("类型不匹配: 期望 {expected}")]
    TypeMismatch { expected: String },

    #[error("构造参数缺失: 第 {index} 个参数 ({expected})")]
    ArgumentMissing { index: usize, expected: String },

    #[error("类型 {type_name} 没有公开的构造函数")]
    NoConstructor { type_name: String },

    #[error("类型 {implementation} 没有声明契约 {contract}")]
    ContractNotImplemented {
        implementation: String,
        contract: String,
    },
}

impl DependencyError {
    /// 创建组件创建失败错误
    pub fn creation_failed(
        type_name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }
}

/// 单个构造函数的探测失败记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorFailure {
    /// 构造函数在声明顺序中的位置
    pub index: usize,
    /// 构造函数签名，例如 `(OrderRepository, Clock)`
    pub signature: String,
    /// 失败原因
    pub message: String,
}

impl std::fmt::Display for ConstructorFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {}: {}", self.index, self.signature, self.message)
    }
}

/// IOC 引擎错误类型
#[derive(Error, Debug)]
pub enum IocError {
    #[error("发现错误: {source}")]
    Discovery {
        #[from]
        source: DiscoveryError,
    },

    #[error("依赖注入错误: {source}")]
    Dependency {
        #[from]
        source: DependencyError,
    },

    /// `source` 为最后一个尝试的构造函数的失败原因，`attempts` 保留全部尝试
    #[error("没有找到依赖全部可满足的构造函数: {type_name}（共尝试 {} 个）", .attempts.len())]
    ConstructionFailed {
        type_name: String,
        attempts: Vec<ConstructorFailure>,
        source: Box<DependencyError>,
    },

    #[error("IOC 引擎尚未完成配置")]
    NotConfigured,

    #[error("IOC 引擎已经完成配置")]
    AlreadyConfigured,
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("IOC 错误: {source}")]
    IocError {
        #[from]
        source: IocError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type IocResult<T> = Result<T, IocError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
