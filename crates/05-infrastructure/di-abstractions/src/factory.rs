//! 组件工厂抽象接口
//!
//! 工厂在注册时创建并保存，直到解析请求到达对应的具体类型时才被调用。

use crate::resolver::{ComponentResolver, ResolveContext};
use infrastructure_common::{
    ConstructorDescriptor, DependencyResult, Instance, TypeDescriptor, TypeInfo,
};
use std::fmt;

/// 组件工厂 trait
///
/// 无参的实例生产者：构造函数依赖在调用时通过解析器解析。
/// 每次调用都产生新实例。
pub trait ComponentFactory {
    /// 创建组件实例，返回具体类型视图的实例
    fn create(
        &self,
        resolver: &dyn ComponentResolver,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance>;

    /// 获取工厂支持的组件类型
    fn component_type(&self) -> &TypeInfo;

    /// 获取构造时需要解析的依赖类型
    fn dependencies(&self) -> &[TypeInfo];
}

/// 工厂类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryKind {
    /// 通过解析器解析构造参数后调用构造函数
    Injecting,
    /// 直接调用无参构造函数
    Parameterless,
}

/// 基于构造函数描述的工厂
#[derive(Clone)]
pub struct ConstructorFactory {
    component_type: TypeInfo,
    constructor: ConstructorDescriptor,
}

impl ConstructorFactory {
    /// 按描述符选择工厂
    ///
    /// 唯一的构造函数带参数时，调用时先按参数顺序解析每个参数；
    /// 唯一的构造函数无参时直接调用；没有构造函数时返回 `None`。
    /// 多个构造函数的情况应在注册校验阶段被拒绝，这里只取第一个。
    pub fn from_descriptor(descriptor: &TypeDescriptor) -> Option<Self> {
        descriptor.constructors().first().map(|constructor| Self {
            component_type: *descriptor.type_info(),
            constructor: constructor.clone(),
        })
    }

    /// 工厂类型
    pub fn kind(&self) -> FactoryKind {
        if self.constructor.is_parameterless() {
            FactoryKind::Parameterless
        } else {
            FactoryKind::Injecting
        }
    }
}

impl ComponentFactory for ConstructorFactory {
    fn create(
        &self,
        resolver: &dyn ComponentResolver,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        match self.kind() {
            FactoryKind::Injecting => {
                let arguments = self
                    .constructor
                    .parameters()
                    .iter()
                    .map(|parameter| resolver.resolve_in(parameter, context))
                    .collect::<DependencyResult<Vec<_>>>()?;
                self.constructor.invoke(arguments)
            }
            FactoryKind::Parameterless => self.constructor.invoke(Vec::new()),
        }
    }

    fn component_type(&self) -> &TypeInfo {
        &self.component_type
    }

    fn dependencies(&self) -> &[TypeInfo] {
        self.constructor.parameters()
    }
}

impl fmt::Debug for ConstructorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorFactory")
            .field("component_type", &self.component_type.name)
            .field("kind", &self.kind())
            .field("dependencies", &self.constructor.parameters())
            .finish()
    }
}
