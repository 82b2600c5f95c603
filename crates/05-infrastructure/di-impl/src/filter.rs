//! 模块名称过滤器

use ioc_common::{DiscoveryError, DiscoveryResult, IocOptions};
use regex::{Regex, RegexBuilder};

/// 模块名称过滤器
///
/// 名称命中拒绝模式时不通过；否则命中允许模式才通过。两个模式都不区分大小写。
#[derive(Debug, Clone)]
pub struct PatternFilter {
    skip: Regex,
    restrict: Regex,
}

impl PatternFilter {
    /// 编译过滤器，模式无效时返回 [`DiscoveryError::InvalidPattern`]
    pub fn new(skip_pattern: &str, restrict_pattern: &str) -> DiscoveryResult<Self> {
        Ok(Self {
            skip: compile(skip_pattern)?,
            restrict: compile(restrict_pattern)?,
        })
    }

    pub fn from_options(options: &IocOptions) -> DiscoveryResult<Self> {
        Self::new(&options.skip_pattern, &options.restrict_pattern)
    }

    /// 模块名称是否通过过滤
    pub fn matches(&self, name: &str) -> bool {
        !self.skip.is_match(name) && self.restrict.is_match(name)
    }

    pub fn skip_pattern(&self) -> &str {
        self.skip.as_str()
    }

    pub fn restrict_pattern(&self) -> &str {
        self.restrict.as_str()
    }
}

fn compile(pattern: &str) -> DiscoveryResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| DiscoveryError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}
