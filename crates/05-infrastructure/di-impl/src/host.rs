//! 宿主类型查找器
//!
//! 在普通类型查找器之上，先把部署目录中的模块映像加载进来。

use crate::finder::ModuleTypeFinder;
use crate::image::ModuleImage;
use ioc_abstractions::{ModuleProvider, TypeFinder};
use ioc_common::{
    CapabilityQuery, DiscoveryError, DiscoveryResult, IocOptions, Module, TypeDescriptor,
};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// 宿主类型查找器
///
/// 部署目录只成功扫描一次；扫描失败时下次调用会重新扫描。
pub struct HostTypeFinder {
    inner: ModuleTypeFinder,
    deployment_scan: OnceCell<usize>,
}

impl HostTypeFinder {
    pub fn new(provider: Arc<dyn ModuleProvider>, options: IocOptions) -> DiscoveryResult<Self> {
        Ok(Self {
            inner: ModuleTypeFinder::new(provider, options)?,
            deployment_scan: OnceCell::new(),
        })
    }

    pub fn options(&self) -> &IocOptions {
        self.inner.options()
    }

    /// 部署目录是否已经扫描过
    pub fn deployment_modules_loaded(&self) -> bool {
        self.deployment_scan.get().is_some()
    }

    /// 确保部署目录中的模块已加载，返回首次扫描时新加载的模块数量
    pub fn ensure_deployment_modules_loaded(&self) -> DiscoveryResult<usize> {
        if !self.options().ensure_deployment_modules_loaded {
            return Ok(0);
        }
        self.deployment_scan
            .get_or_try_init(|| {
                let Some(directory) = self.options().resolved_deployment_directory() else {
                    debug!("无法确定部署目录，跳过部署目录扫描");
                    return Ok(0);
                };
                self.load_matching_modules(&directory)
            })
            .copied()
    }

    fn load_matching_modules(&self, directory: &Path) -> DiscoveryResult<usize> {
        if !directory.is_dir() {
            debug!("部署目录不存在: {}", directory.display());
            return Ok(0);
        }

        let provider = self.inner.provider();
        let mut present: HashSet<String> = provider
            .loaded_modules()
            .iter()
            .map(|module| module.full_name().to_string())
            .collect();

        let mut loaded = 0;
        for path in self.image_files(directory)? {
            let identity = ModuleImage::read_identity(&path)?;
            if !self.inner.matches(&identity) || present.contains(&identity) {
                debug!("跳过模块映像: {} ({})", path.display(), identity);
                continue;
            }

            let module = provider.load(&identity)?;
            debug!("从部署目录加载模块: {}", module.full_name());
            present.insert(identity);
            loaded += 1;
        }

        info!("部署目录 {} 扫描完成，加载 {} 个模块", directory.display(), loaded);
        Ok(loaded)
    }

    /// 目录下（不递归）扩展名匹配的文件，按路径排序
    fn image_files(&self, directory: &Path) -> DiscoveryResult<Vec<PathBuf>> {
        let io_error = |source: std::io::Error| DiscoveryError::Io {
            path: directory.to_path_buf(),
            source,
        };
        let extension = self.options().module_file_extension.as_str();

        let mut files = Vec::new();
        for entry in std::fs::read_dir(directory).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            let matches_extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
            if matches_extension && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl TypeFinder for HostTypeFinder {
    fn modules(&self) -> DiscoveryResult<Vec<Arc<dyn Module>>> {
        self.ensure_deployment_modules_loaded()?;
        self.inner.modules()
    }

    fn find_classes_of_type_in(
        &self,
        query: &CapabilityQuery,
        modules: &[Arc<dyn Module>],
        concrete_only: bool,
    ) -> DiscoveryResult<Vec<TypeDescriptor>> {
        self.inner.find_classes_of_type_in(query, modules, concrete_only)
    }
}
