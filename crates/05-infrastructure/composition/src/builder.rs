//! IOC 宿主构建器

use crate::infrastructure::IocInfrastructure;
use ioc_abstractions::{ModuleProvider, ScopeAccessor};
use ioc_common::{InfrastructureError, IocOptions, Module};
use ioc_engine::{add_ioc_with, ServiceCollection, StaticModuleProvider, TaskLocalScopeAccessor};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// IOC 宿主构建器
///
/// 使用建造者模式组装扫描选项、模块提供者与日志，最后启动引擎。
pub struct IocBuilder {
    /// 扫描选项文件
    config_file: Option<PathBuf>,
    /// 显式指定的扫描选项，优先于配置文件
    options: Option<IocOptions>,
    /// 模块提供者
    module_provider: Option<Arc<dyn ModuleProvider>>,
    /// 内置模块，未指定提供者时使用
    modules: Vec<Arc<dyn Module>>,
    /// 环境作用域访问器
    scope_accessor: Option<Arc<dyn ScopeAccessor>>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl IocBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            config_file: None,
            options: None,
            module_provider: None,
            modules: Vec::new(),
            scope_accessor: None,
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 添加扫描选项文件（TOML / JSON / YAML）
    pub fn add_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, InfrastructureError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InfrastructureError::BootstrapFailed {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        info!("添加扫描选项文件: {}", path.display());
        self.config_file = Some(path.to_path_buf());
        Ok(self)
    }

    /// 直接指定扫描选项，忽略配置文件与环境变量
    pub fn with_options(mut self, options: IocOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// 指定模块提供者
    pub fn with_module_provider(mut self, provider: Arc<dyn ModuleProvider>) -> Self {
        self.module_provider = Some(provider);
        self
    }

    /// 添加一个已加载的内置模块
    pub fn add_module(mut self, module: impl Module + 'static) -> Self {
        self.modules.push(Arc::new(module));
        self
    }

    /// 指定环境作用域访问器，默认使用 tokio 任务本地作用域
    pub fn with_scope_accessor(mut self, accessor: Arc<dyn ScopeAccessor>) -> Self {
        self.scope_accessor = Some(accessor);
        self
    }

    /// 启用日志初始化
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_enabled = true;
        self.logging_config = config;
        self
    }

    /// 开发环境预设
    pub fn auto_configure_development(self) -> Self {
        self.with_logging(LoggingConfig::development())
    }

    /// 生产环境预设
    pub fn auto_configure_production(self) -> Self {
        self.with_logging(LoggingConfig::production())
    }

    /// 启动引擎并返回宿主
    pub fn build(self) -> Result<IocInfrastructure, InfrastructureError> {
        if self.logging_enabled {
            self.initialize_logging()?;
        }

        info!("开始启动 IOC 宿主");

        let options = match self.options {
            Some(options) => options,
            None => IocOptions::load(self.config_file.as_deref())?,
        };
        debug!("扫描选项: {:?}", options);

        let provider = match self.module_provider {
            Some(provider) => {
                if !self.modules.is_empty() {
                    debug!("已指定模块提供者，忽略 {} 个内置模块", self.modules.len());
                }
                provider
            }
            None => {
                let provider = self
                    .modules
                    .into_iter()
                    .fold(StaticModuleProvider::new(), StaticModuleProvider::with_loaded_shared);
                Arc::new(provider)
            }
        };

        let scope_accessor = self
            .scope_accessor
            .unwrap_or_else(|| Arc::new(TaskLocalScopeAccessor));

        let mut services = ServiceCollection::new();
        let engine = add_ioc_with(&mut services, provider, options, scope_accessor)?;

        let infrastructure = IocInfrastructure::new(engine, &services);
        info!(
            "IOC 宿主启动完成，共 {} 条注册",
            infrastructure.registrations().len()
        );
        Ok(infrastructure)
    }

    /// 初始化日志系统
    fn initialize_logging(&self) -> Result<(), InfrastructureError> {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(self.logging_config.level)
            .with_target(self.logging_config.show_target)
            .with_thread_ids(self.logging_config.show_thread_ids)
            .with_file(self.logging_config.show_file)
            .with_line_number(self.logging_config.show_line_number);

        if self.logging_config.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志初始化失败: {e}"),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}

impl Default for IocBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }
}
