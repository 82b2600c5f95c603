//! 类型描述符
//!
//! Rust 没有运行时反射，可被扫描的类型需要显式描述自己：
//! 声明了哪些能力（trait），以及有哪些公开构造函数。
//!
//! ```rust
//! use ioc_common::{SingletonDependency, TypeDescriptor};
//! use std::sync::Arc;
//!
//! pub trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! pub struct SystemClock;
//!
//! impl Clock for SystemClock {
//!     fn now(&self) -> u64 {
//!         0
//!     }
//! }
//!
//! impl SingletonDependency for SystemClock {}
//!
//! let descriptor = TypeDescriptor::concrete::<SystemClock>()
//!     .singleton()
//!     .implements::<dyn Clock>(|clock| clock)
//!     .constructor0(|| SystemClock)
//!     .build();
//!
//! assert_eq!(descriptor.name(), "SystemClock");
//! ```

use crate::errors::DependencyError;
use crate::lifecycle::{Lifetime, ScopedDependency, SingletonDependency, TransientDependency};
use crate::metadata::{downcast_instance, into_instance, Instance, TypeInfo};
use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 实例向上转换函数：具体类型实例 -> 契约实例
pub type UpcastFn = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;

/// 构造函数
pub type ConstructorFn =
    Arc<dyn Fn(&Arguments) -> Result<Instance, DependencyError> + Send + Sync>;

/// 类型种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// 可实例化的具体类型
    Concrete,
    /// 不可直接实例化的抽象类型
    Abstract,
    /// 接口（trait）
    Interface,
}

/// 类型声明的一项能力
#[derive(Clone)]
pub struct CapabilityBinding {
    contract: TypeInfo,
    upcast: Option<UpcastFn>,
}

impl CapabilityBinding {
    /// 契约类型
    pub fn contract(&self) -> &TypeInfo {
        &self.contract
    }

    /// 能力所属泛型定义
    pub fn generic_definition(&self) -> Option<&str> {
        self.contract.generic_definition()
    }

    /// 是否为生命周期标记
    pub fn is_lifetime_marker(&self) -> bool {
        Lifetime::from_marker(self.contract.id).is_some()
    }

    /// 将具体类型实例转换为契约实例
    pub fn upcast(&self, instance: &Instance) -> Option<Instance> {
        self.upcast.as_ref().and_then(|upcast| upcast(instance))
    }
}

impl fmt::Debug for CapabilityBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityBinding")
            .field("contract", &self.contract.module_path)
            .field("upcast", &self.upcast.as_ref().map(|_| "<function>"))
            .finish()
    }
}

/// 构造参数
pub struct Arguments {
    parameters: Vec<TypeInfo>,
    values: Vec<Instance>,
}

impl Arguments {
    /// 按参数声明顺序创建参数列表
    pub fn new(parameters: Vec<TypeInfo>, values: Vec<Instance>) -> Self {
        Self { parameters, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 取第 `index` 个参数
    pub fn get<C>(&self, index: usize) -> Result<Arc<C>, DependencyError>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let value = self
            .values
            .get(index)
            .ok_or_else(|| DependencyError::ArgumentMissing {
                index,
                expected: std::any::type_name::<C>().to_string(),
            })?;

        downcast_instance::<C>(value).ok_or_else(|| DependencyError::TypeMismatch {
            expected: self
                .parameters
                .get(index)
                .map(|parameter| parameter.module_path.clone())
                .unwrap_or_else(|| std::any::type_name::<C>().to_string()),
        })
    }
}

/// 公开构造函数描述
#[derive(Clone)]
pub struct ConstructorDescriptor {
    parameters: Vec<TypeInfo>,
    factory: ConstructorFn,
}

impl ConstructorDescriptor {
    /// 创建构造函数描述
    pub fn new(parameters: Vec<TypeInfo>, factory: ConstructorFn) -> Self {
        Self {
            parameters,
            factory,
        }
    }

    /// 参数类型列表
    pub fn parameters(&self) -> &[TypeInfo] {
        &self.parameters
    }

    /// 形如 `(Clock, OrderRepository)` 的签名
    pub fn signature(&self) -> String {
        let names: Vec<&str> = self.parameters.iter().map(TypeInfo::short_name).collect();
        format!("({})", names.join(", "))
    }

    /// 使用已解析的参数调用构造函数
    pub fn invoke(&self, values: Vec<Instance>) -> Result<Instance, DependencyError> {
        let arguments = Arguments::new(self.parameters.clone(), values);
        (self.factory)(&arguments)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("signature", &self.signature())
            .field("factory", &"<function>")
            .finish()
    }
}

/// 类型描述符
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    type_info: TypeInfo,
    kind: TypeKind,
    capabilities: Vec<CapabilityBinding>,
    constructors: Vec<ConstructorDescriptor>,
}

impl TypeDescriptor {
    /// 描述一个具体类型
    pub fn concrete<T: Send + Sync + 'static>() -> TypeBuilder<T> {
        TypeBuilder {
            descriptor: Self::bare(TypeInfo::of::<T>(), TypeKind::Concrete),
            _marker: PhantomData,
        }
    }

    /// 描述一个接口（trait 对象类型）
    pub fn interface<C: ?Sized + 'static>() -> Self {
        Self::bare(TypeInfo::of::<C>(), TypeKind::Interface)
    }

    /// 描述一个抽象类型
    pub fn abstract_type<T: ?Sized + 'static>() -> Self {
        Self::bare(TypeInfo::of::<T>(), TypeKind::Abstract)
    }

    fn bare(type_info: TypeInfo, kind: TypeKind) -> Self {
        Self {
            type_info,
            kind,
            capabilities: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// 追加一项仅含元数据的能力声明（不可向上转换）
    pub fn declaring(mut self, contract: TypeInfo) -> Self {
        self.capabilities.push(CapabilityBinding {
            contract,
            upcast: None,
        });
        self
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 简短类型名称
    pub fn name(&self) -> &str {
        self.type_info.short_name()
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// 是否为可实例化的具体类型
    pub fn is_concrete(&self) -> bool {
        self.kind == TypeKind::Concrete
    }

    /// 按声明顺序排列的能力
    pub fn capabilities(&self) -> &[CapabilityBinding] {
        &self.capabilities
    }

    /// 按声明顺序排列的公开构造函数
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// 是否直接声明了指定能力
    pub fn declares(&self, id: TypeId) -> bool {
        self.capabilities.iter().any(|binding| binding.contract.id == id)
    }

    /// 是否声明了指定泛型定义的任意实例
    pub fn declares_generic(&self, definition: &str) -> bool {
        self.capabilities
            .iter()
            .any(|binding| binding.generic_definition() == Some(definition))
    }

    /// 按声明顺序返回类型声明的生命周期标记
    pub fn lifetime_markers(&self) -> Vec<Lifetime> {
        self.capabilities
            .iter()
            .filter_map(|binding| Lifetime::from_marker(binding.contract.id))
            .collect()
    }

    /// 将本类型的实例转换为指定契约的实例
    ///
    /// 契约为类型本身时原样返回。
    pub fn upcast_to(&self, contract: &TypeInfo, instance: &Instance) -> Option<Instance> {
        if contract.id == self.type_info.id {
            return Some(instance.clone());
        }
        self.capabilities
            .iter()
            .find(|binding| binding.contract.id == contract.id)
            .and_then(|binding| binding.upcast(instance))
    }
}

/// 具体类型描述构建器
pub struct TypeBuilder<T> {
    descriptor: TypeDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> TypeBuilder<T> {
    /// 声明实现了契约 `C`
    ///
    /// 声明顺序决定契约推断时的优先级。
    pub fn implements<C>(mut self, upcast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let cast: UpcastFn = Arc::new(move |instance: &Instance| {
            downcast_instance::<T>(instance).map(|concrete| into_instance::<C>(upcast(concrete)))
        });
        self.descriptor.capabilities.push(CapabilityBinding {
            contract: TypeInfo::of::<C>(),
            upcast: Some(cast),
        });
        self
    }

    /// 声明实现了泛型契约 `C`，例如 `dyn Repository<Order>`
    ///
    /// 与 [`implements`](Self::implements) 相同，单独命名以便阅读。
    pub fn implements_generic<C>(self, upcast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.implements(upcast)
    }

    pub fn transient(self) -> Self
    where
        T: TransientDependency,
    {
        self.implements::<dyn TransientDependency>(|instance| instance)
    }

    pub fn scoped(self) -> Self
    where
        T: ScopedDependency,
    {
        self.implements::<dyn ScopedDependency>(|instance| instance)
    }

    pub fn singleton(self) -> Self
    where
        T: SingletonDependency,
    {
        self.implements::<dyn SingletonDependency>(|instance| instance)
    }

    /// 声明一个可能失败的构造函数
    pub fn constructor<F>(mut self, parameters: Vec<TypeInfo>, factory: F) -> Self
    where
        F: Fn(&Arguments) -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        let factory: ConstructorFn =
            Arc::new(move |arguments: &Arguments| Ok(into_instance(Arc::new(factory(arguments)?))));
        self.descriptor
            .constructors
            .push(ConstructorDescriptor::new(parameters, factory));
        self
    }

    /// 无参构造函数
    pub fn constructor0<F>(self, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.constructor(Vec::new(), move |_| Ok(factory()))
    }

    pub fn constructor1<A, F>(self, factory: F) -> Self
    where
        A: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<A>) -> T + Send + Sync + 'static,
    {
        self.constructor(vec![TypeInfo::of::<A>()], move |arguments| {
            Ok(factory(arguments.get::<A>(0)?))
        })
    }

    pub fn constructor2<A, B, F>(self, factory: F) -> Self
    where
        A: ?Sized + Send + Sync + 'static,
        B: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<A>, Arc<B>) -> T + Send + Sync + 'static,
    {
        self.constructor(
            vec![TypeInfo::of::<A>(), TypeInfo::of::<B>()],
            move |arguments| Ok(factory(arguments.get::<A>(0)?, arguments.get::<B>(1)?)),
        )
    }

    pub fn constructor3<A, B, C, F>(self, factory: F) -> Self
    where
        A: ?Sized + Send + Sync + 'static,
        B: ?Sized + Send + Sync + 'static,
        C: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<A>, Arc<B>, Arc<C>) -> T + Send + Sync + 'static,
    {
        self.constructor(
            vec![TypeInfo::of::<A>(), TypeInfo::of::<B>(), TypeInfo::of::<C>()],
            move |arguments| {
                Ok(factory(
                    arguments.get::<A>(0)?,
                    arguments.get::<B>(1)?,
                    arguments.get::<C>(2)?,
                ))
            },
        )
    }

    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}

impl<T: Send + Sync + 'static> From<TypeBuilder<T>> for TypeDescriptor {
    fn from(builder: TypeBuilder<T>) -> Self {
        builder.build()
    }
}

/// 能够描述自身的类型，用于类型化的未注册类型解析
pub trait Injectable: Send + Sync + Sized + 'static {
    /// 返回本类型的描述符
    fn describe() -> TypeDescriptor;
}

/// 能力查询条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityQuery {
    /// 精确匹配某个契约
    Exact(TypeInfo),
    /// 匹配某个开放泛型定义的任意实例
    OpenGeneric { definition: String },
}

impl CapabilityQuery {
    pub fn of<C: ?Sized + 'static>() -> Self {
        Self::Exact(TypeInfo::of::<C>())
    }

    /// 按泛型定义的完整路径查询，例如 `shop::contracts::Repository`
    pub fn open_generic(definition: impl Into<String>) -> Self {
        Self::OpenGeneric {
            definition: definition.into(),
        }
    }

    /// 以任意一个泛型实例推导出开放泛型定义
    pub fn open_generic_of<C: ?Sized + 'static>() -> Self {
        let info = TypeInfo::of::<C>();
        let definition = info
            .generic_definition()
            .map(str::to_string)
            .unwrap_or_else(|| info.module_path.clone());
        Self::OpenGeneric { definition }
    }

    /// 类型是否就是被查询的能力本身
    pub fn is_query_type(&self, descriptor: &TypeDescriptor) -> bool {
        match self {
            Self::Exact(info) => descriptor.type_info().id == info.id,
            Self::OpenGeneric { definition } => {
                descriptor.type_info().generic_definition() == Some(definition.as_str())
            }
        }
    }

    /// 类型是否声明了被查询的能力
    pub fn is_declared_by(&self, descriptor: &TypeDescriptor) -> bool {
        match self {
            Self::Exact(info) => descriptor.declares(info.id),
            Self::OpenGeneric { definition } => descriptor.declares_generic(definition),
        }
    }
}

impl fmt::Display for CapabilityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(info) => write!(f, "{}", info.module_path),
            Self::OpenGeneric { definition } => write!(f, "{definition}<>"),
        }
    }
}
