//! 演示用的商店模块
//!
//! `shop.core` 随程序一起加载；`shop.plugins.audit` 只有在部署目录中
//! 找到对应的模块映像时才会被加载。

use ioc_common::{
    Injectable, ModuleDescriptor, ScopedDependency, SingletonDependency, TransientDependency,
    TypeDescriptor,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 审计插件模块名称
pub const AUDIT_MODULE: &str = "shop.plugins.audit, version=0.1.0";

pub mod contracts {
    /// 定价服务
    pub trait PricingService: Send + Sync {
        fn quote(&self, sku: &str, quantity: u32) -> u64;
    }

    /// 通知渠道
    pub trait Notifier: Send + Sync {
        fn channel(&self) -> &'static str;
        fn notify(&self, message: &str) -> String {
            format!("[{}] {message}", self.channel())
        }
    }

    /// 每个请求一份的上下文
    pub trait RequestContext: Send + Sync {
        fn request_id(&self) -> usize;
    }

    /// 审计记录
    pub trait AuditTrail: Send + Sync {
        fn record(&self, entry: &str) -> String;
    }
}

pub mod pricing {
    use super::contracts;

    pub struct PricingService;

    impl contracts::PricingService for PricingService {
        fn quote(&self, sku: &str, quantity: u32) -> u64 {
            let unit = 100 + sku.len() as u64 * 25;
            unit * u64::from(quantity)
        }
    }
}

pub mod email {
    pub struct Notifier;

    impl super::contracts::Notifier for Notifier {
        fn channel(&self) -> &'static str {
            "email"
        }
    }
}

pub mod sms {
    pub struct Notifier;

    impl super::contracts::Notifier for Notifier {
        fn channel(&self) -> &'static str {
            "sms"
        }
    }
}

pub mod request {
    pub struct RequestContext {
        pub id: usize,
    }

    impl super::contracts::RequestContext for RequestContext {
        fn request_id(&self) -> usize {
            self.id
        }
    }
}

pub mod audit {
    pub struct AuditTrail;

    impl super::contracts::AuditTrail for AuditTrail {
        fn record(&self, entry: &str) -> String {
            format!("audit: {entry}")
        }
    }
}

impl SingletonDependency for pricing::PricingService {}
impl TransientDependency for email::Notifier {}
impl TransientDependency for sms::Notifier {}
impl ScopedDependency for request::RequestContext {}
impl SingletonDependency for audit::AuditTrail {}

static NEXT_REQUEST: AtomicUsize = AtomicUsize::new(1);

/// 程序自带的核心模块
pub fn core_module() -> ModuleDescriptor {
    ModuleDescriptor::new("shop.core, version=0.1.0")
        .with_type(TypeDescriptor::interface::<dyn contracts::PricingService>())
        .with_type(TypeDescriptor::interface::<dyn contracts::Notifier>())
        .with_type(
            TypeDescriptor::concrete::<pricing::PricingService>()
                .singleton()
                .implements::<dyn contracts::PricingService>(|service| service)
                .constructor0(|| pricing::PricingService),
        )
        .with_type(
            TypeDescriptor::concrete::<email::Notifier>()
                .transient()
                .implements::<dyn contracts::Notifier>(|notifier| notifier)
                .constructor0(|| email::Notifier),
        )
        .with_type(
            TypeDescriptor::concrete::<sms::Notifier>()
                .transient()
                .implements::<dyn contracts::Notifier>(|notifier| notifier)
                .constructor0(|| sms::Notifier),
        )
        .with_type(
            TypeDescriptor::concrete::<request::RequestContext>()
                .scoped()
                .implements::<dyn contracts::RequestContext>(|context| context)
                .constructor0(|| request::RequestContext {
                    id: NEXT_REQUEST.fetch_add(1, Ordering::SeqCst),
                }),
        )
}

/// 部署目录中的可选插件模块
pub fn audit_module() -> ModuleDescriptor {
    ModuleDescriptor::new(AUDIT_MODULE).with_type(
        TypeDescriptor::concrete::<audit::AuditTrail>()
            .singleton()
            .implements::<dyn contracts::AuditTrail>(|trail| trail)
            .constructor0(|| audit::AuditTrail),
    )
}

/// 未注册的结账流程，按需构造
pub struct CheckoutWorkflow {
    pricing: Arc<dyn contracts::PricingService>,
    notifier: Arc<dyn contracts::Notifier>,
    audit: Option<Arc<dyn contracts::AuditTrail>>,
}

impl CheckoutWorkflow {
    /// 结账并返回通知内容
    pub fn checkout(&self, sku: &str, quantity: u32) -> Vec<String> {
        let total = self.pricing.quote(sku, quantity);
        let summary = format!("{quantity} x {sku} = {total}");
        let mut lines = vec![self.notifier.notify(&summary)];
        if let Some(audit) = &self.audit {
            lines.push(audit.record(&summary));
        }
        lines
    }
}

impl Injectable for CheckoutWorkflow {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::concrete::<CheckoutWorkflow>()
            .constructor3::<dyn contracts::PricingService, dyn contracts::Notifier, dyn contracts::AuditTrail, _>(
                |pricing, notifier, audit| CheckoutWorkflow {
                    pricing,
                    notifier,
                    audit: Some(audit),
                },
            )
            .constructor2::<dyn contracts::PricingService, dyn contracts::Notifier, _>(
                |pricing, notifier| CheckoutWorkflow {
                    pricing,
                    notifier,
                    audit: None,
                },
            )
            .build()
    }
}
