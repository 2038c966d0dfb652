//! 组件基础接口定义
//!
//! 提供可组合类型与契约必须实现的基础 trait

use crate::descriptor::{PropertyDescriptor, TypeDescriptor};

/// 契约 trait
///
/// 描述一个可被请求的类型对外可见的导入属性。解析时只注入请求类型
/// 声明的导入属性，因此通过 `dyn Trait` 请求时，具体实现上额外声明的
/// 导入属性不会被注入。
///
/// `dyn Trait` 契约需要手工实现：
///
/// ```rust
/// use infrastructure_common::Contract;
///
/// pub trait Greeter {
///     fn greet(&self) -> String;
/// }
///
/// impl Contract for dyn Greeter {}
/// ```
pub trait Contract: 'static {
    /// 契约声明的导入属性
    fn imports() -> Vec<PropertyDescriptor> {
        Vec::new()
    }
}

/// 可组合类型 trait
///
/// 通常由 `#[derive(Composable)]` 生成实现。
pub trait Composable: Contract + Sized {
    /// 类型描述符
    fn descriptor() -> TypeDescriptor;
}
