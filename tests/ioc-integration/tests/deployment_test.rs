//! 部署目录扫描

mod common;

use common::{boot_with, contracts, provider};
use ioc_abstractions::IocEngineExt;
use ioc_common::{DiscoveryError, IocError, IocOptions};
use ioc_engine::ModuleImage;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn deployment_options(directory: &Path) -> IocOptions {
    IocOptions::default().with_deployment_directory(directory)
}

#[test]
fn test_module_image_in_deployment_directory_is_loaded() {
    let directory = TempDir::new().expect("创建临时目录失败");
    ModuleImage::write(
        &directory.path().join("billing_timing.iocm"),
        "billing.timing, version=2.0.0",
    )
    .expect("写入模块映像失败");
    // 扩展名不匹配的文件被忽略
    fs::write(directory.path().join("notes.txt"), "不是模块").expect("写入失败");

    let provider = provider();
    let (engine, _) =
        boot_with(provider.clone(), deployment_options(directory.path())).expect("启动失败");

    assert!(engine.type_finder().deployment_modules_loaded());
    assert_eq!(provider.available_count(), 0);
    let clock = engine
        .resolve::<dyn contracts::Clock>()
        .expect("解析失败")
        .expect("计时模块来自部署目录");
    assert_eq!(clock.now(), 42);
}

#[test]
fn test_images_rejected_by_patterns_are_not_loaded() {
    let directory = TempDir::new().expect("创建临时目录失败");
    ModuleImage::write(
        &directory.path().join("billing_timing.iocm"),
        "billing.timing, version=2.0.0",
    )
    .expect("写入模块映像失败");

    let provider = provider();
    let (engine, _) = boot_with(
        provider.clone(),
        deployment_options(directory.path()).with_skip_pattern("^billing"),
    )
    .expect("启动失败");

    assert_eq!(provider.available_count(), 1);
    assert!(engine
        .resolve::<dyn contracts::Clock>()
        .expect("解析失败")
        .is_none());
}

#[test]
fn test_corrupt_image_aborts_configuration() {
    let directory = TempDir::new().expect("创建临时目录失败");
    fs::write(directory.path().join("broken.iocm"), b"MZ\x90\x00").expect("写入失败");

    let error = boot_with(provider(), deployment_options(directory.path()))
        .err()
        .expect("映像损坏")
        .downcast::<IocError>()
        .expect("应为 IOC 错误");
    assert!(matches!(
        error,
        IocError::Discovery {
            source: DiscoveryError::BadImageFormat { .. }
        }
    ));
}

#[test]
fn test_image_naming_unknown_module_fails() {
    let directory = TempDir::new().expect("创建临时目录失败");
    ModuleImage::write(&directory.path().join("ledger.iocm"), "billing.ledger")
        .expect("写入模块映像失败");

    let error = boot_with(provider(), deployment_options(directory.path()))
        .err()
        .expect("模块无法加载")
        .downcast::<IocError>()
        .expect("应为 IOC 错误");
    assert!(matches!(
        error,
        IocError::Discovery {
            source: DiscoveryError::ModuleNotFound { .. }
        }
    ));
}

#[test]
fn test_missing_deployment_directory_is_ignored() {
    let directory = TempDir::new().expect("创建临时目录失败");
    let missing = directory.path().join("plugins");

    let (engine, _) = boot_with(provider(), deployment_options(&missing)).expect("启动失败");
    assert!(engine.type_finder().deployment_modules_loaded());
    assert!(engine
        .resolve::<dyn contracts::Clock>()
        .expect("解析失败")
        .is_none());
}
