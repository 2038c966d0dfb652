//! 模块定义
//!
//! 模块是一批一起注册的类型描述符，只用来拒绝重复注册同一批类型。

use crate::component::Composable;
use crate::descriptor::TypeDescriptor;
use uuid::Uuid;

/// 组件模块
///
/// 身份由创建时分配的 [`Uuid`] 决定，克隆出的模块与原模块是同一个模块。
#[derive(Debug, Clone)]
pub struct Module {
    id: Uuid,
    name: String,
    types: Vec<TypeDescriptor>,
}

impl Module {
    /// 创建新的空模块
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            types: Vec::new(),
        }
    }

    /// 添加类型描述符
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.types.push(descriptor);
        self
    }

    /// 添加可组合类型
    pub fn with_composable<T: Composable>(self) -> Self {
        self.with_type(T::descriptor())
    }

    /// 模块ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 模块名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 模块中的全部类型描述符
    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }
}
