//! # 示例应用程序
//!
//! 演示基于约定的 IOC 引擎：扫描演示模块（以及可选的部署目录），
//! 打印注册表，解析服务并按需构造未注册的结账流程。

mod shop;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ioc_abstractions::IocEngineExt;
use ioc_composition::{IocBuilder, IocInfrastructure, LoggingConfig};
use ioc_common::{IocOptions, DEFAULT_MODULE_FILE_EXTENSION};
use ioc_engine::{ModuleImage, StaticModuleProvider};
use shop::contracts::{Notifier, RequestContext};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "基于约定的 IOC 引擎示例应用")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// 扫描选项文件路径
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 启用开发日志
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 启动引擎并演示解析
    Run {
        /// 部署目录，覆盖配置中的值
        #[arg(long)]
        deployment_dir: Option<PathBuf>,

        /// 注册表输出格式
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// 结账的商品
        #[arg(long, default_value = "keyboard")]
        sku: String,

        /// 结账数量
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// 把审计插件的模块映像写入部署目录
    Pack {
        /// 部署目录
        #[arg(long)]
        dir: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command.unwrap_or(Command::Run {
        deployment_dir: None,
        format: OutputFormat::Text,
        sku: "keyboard".to_string(),
        quantity: 1,
    }) {
        Command::Run {
            deployment_dir,
            format,
            sku,
            quantity,
        } => {
            let infrastructure = boot(args.config.as_deref(), deployment_dir, args.verbose)?;
            print_registrations(&infrastructure, format)?;
            demonstrate_resolution(&infrastructure, &sku, quantity).await
        }
        Command::Pack { dir } => pack(&dir),
    }
}

/// 启动引擎
fn boot(
    config: Option<&Path>,
    deployment_dir: Option<PathBuf>,
    verbose: bool,
) -> Result<IocInfrastructure> {
    let mut options = IocOptions::load(config).context("加载扫描选项失败")?;
    if let Some(dir) = deployment_dir {
        options = options.with_deployment_directory(dir);
    }

    let provider = StaticModuleProvider::new()
        .with_loaded(shop::core_module())
        .with_available(shop::audit_module());

    let mut builder = IocBuilder::new()
        .with_options(options)
        .with_module_provider(Arc::new(provider));
    if verbose {
        builder = builder.with_logging(LoggingConfig::development());
    }

    builder.build().context("启动 IOC 引擎失败")
}

/// 打印注册表
fn print_registrations(infrastructure: &IocInfrastructure, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(infrastructure.registrations())?
            );
        }
        OutputFormat::Text => {
            println!("{:<20} {:<20} {}", "契约", "实现", "生命周期");
            for registration in infrastructure.registrations() {
                println!(
                    "{:<20} {:<20} {:?}",
                    registration.contract, registration.implementation, registration.lifetime
                );
            }
        }
    }
    Ok(())
}

/// 演示解析
async fn demonstrate_resolution(
    infrastructure: &IocInfrastructure,
    sku: &str,
    quantity: u32,
) -> Result<()> {
    let engine = infrastructure.engine().clone();

    let channels: Vec<&'static str> = engine
        .resolve_all::<dyn Notifier>()?
        .iter()
        .map(|notifier| notifier.channel())
        .collect();
    info!("已注册的通知渠道: {:?}", channels);

    let workflow = engine.resolve_unregistered::<shop::CheckoutWorkflow>()?;
    for line in workflow.checkout(sku, quantity) {
        println!("{line}");
    }

    for _ in 0..2 {
        let engine = engine.clone();
        let request_id = infrastructure
            .run_scoped(async move {
                engine
                    .resolve::<dyn RequestContext>()
                    .map(|context| context.map(|context| context.request_id()))
            })
            .await??
            .context("RequestContext 未注册")?;
        println!("请求作用域: #{request_id}");
    }

    Ok(())
}

/// 写入审计插件的模块映像
fn pack(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("创建目录失败: {}", dir.display()))?;
    let path = dir
        .join("shop_plugins_audit")
        .with_extension(DEFAULT_MODULE_FILE_EXTENSION);
    ModuleImage::write(&path, shop::AUDIT_MODULE)?;
    println!("已写入模块映像: {}", path.display());
    Ok(())
}
