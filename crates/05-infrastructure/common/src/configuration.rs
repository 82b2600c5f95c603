//! 扫描器配置

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 默认跳过的模块名称模式：工具链与常见生态 crate
pub const DEFAULT_SKIP_PATTERN: &str = "^(?:std|core|alloc|proc_macro|test|tokio|tokio_util|futures|\
futures_util|mio|bytes|serde|serde_json|serde_yaml|toml|tracing|tracing_subscriber|log|regex|\
regex_syntax|aho_corasick|memchr|once_cell|lazy_static|parking_lot|dashmap|chrono|uuid|thiserror|\
anyhow|config|clap|hyper|http|axum|tower|reqwest|rand|libc|hashbrown|smallvec|itertools)(?:$|[,.:_-])";

/// 默认允许的模块名称模式
pub const DEFAULT_RESTRICT_PATTERN: &str = ".*";

/// 默认的模块映像文件扩展名
pub const DEFAULT_MODULE_FILE_EXTENSION: &str = "iocm";

/// 环境变量前缀
pub const ENVIRONMENT_PREFIX: &str = "IOC";

/// IOC 引擎扫描选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IocOptions {
    /// 是否扫描当前已加载的模块
    pub load_app_domain_modules: bool,
    /// 需要额外加载的模块名称
    pub module_names: Vec<String>,
    /// 拒绝模式，匹配到的模块不参与扫描
    pub skip_pattern: String,
    /// 允许模式，只有匹配到的模块参与扫描
    pub restrict_pattern: String,
    /// 是否忽略模块类型元数据的读取错误
    pub ignore_reflection_errors: bool,
    /// 配置前是否先加载部署目录中的模块
    pub ensure_deployment_modules_loaded: bool,
    /// 部署目录，未设置时使用当前可执行文件所在目录
    pub deployment_directory: Option<PathBuf>,
    /// 模块映像文件扩展名（不含点）
    pub module_file_extension: String,
}

impl Default for IocOptions {
    fn default() -> Self {
        Self {
            load_app_domain_modules: true,
            module_names: Vec::new(),
            skip_pattern: DEFAULT_SKIP_PATTERN.to_string(),
            restrict_pattern: DEFAULT_RESTRICT_PATTERN.to_string(),
            ignore_reflection_errors: true,
            ensure_deployment_modules_loaded: true,
            deployment_directory: None,
            module_file_extension: DEFAULT_MODULE_FILE_EXTENSION.to_string(),
        }
    }
}

impl IocOptions {
    /// 从配置文件与 `IOC_` 前缀的环境变量加载选项
    ///
    /// 未指定文件时只读取环境变量；指定的文件不存在时返回错误。
    pub fn load(file: Option<&Path>) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            builder = builder.add_source(config::File::from(path));
        }

        let options: Self = builder
            .add_source(
                config::Environment::with_prefix(ENVIRONMENT_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("module_names"),
            )
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| ConfigError::ParseError {
                source: Box::new(e),
            })?;

        options.validate()?;
        tracing::debug!("加载 IOC 扫描选项: {:?}", options);
        Ok(options)
    }

    /// 校验选项
    pub fn validate(&self) -> ConfigResult<()> {
        let extension = self.module_file_extension.trim();
        if extension.is_empty() || extension.starts_with('.') {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "模块映像扩展名无效: '{}'，应为不含点的非空字符串",
                    self.module_file_extension
                ),
            });
        }
        if self.module_names.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::ValidationError {
                message: "module_names 中包含空名称".to_string(),
            });
        }
        Ok(())
    }

    /// 实际使用的部署目录
    pub fn resolved_deployment_directory(&self) -> Option<PathBuf> {
        self.deployment_directory.clone().or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf))
        })
    }

    pub fn with_module_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.module_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_skip_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.skip_pattern = pattern.into();
        self
    }

    pub fn with_restrict_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.restrict_pattern = pattern.into();
        self
    }

    pub fn with_deployment_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.deployment_directory = Some(directory.into());
        self
    }

    /// 不扫描部署目录
    pub fn without_deployment_scan(mut self) -> Self {
        self.ensure_deployment_modules_loaded = false;
        self
    }

    /// 严格模式：类型元数据读取失败时中止扫描
    pub fn strict(mut self) -> Self {
        self.ignore_reflection_errors = false;
        self
    }
}
