//! # Infrastructure Common
//!
//! 这个 crate 提供依赖注入容器的公共类型。
//!
//! ## 核心组件
//!
//! - [`TypeInfo`] - 类型标识
//! - [`TypeDescriptor`] - 类型描述符（导出标记、导入属性、构造函数、实现的契约）
//! - [`Module`] - 一批一起注册的类型
//! - [`Composable`] / [`Contract`] - 类型描述层需要实现的 trait
//! - [`DependencyError`] - 注册与解析错误
//!
//! ## 设计原则
//!
//! - 容器不做运行时反射，只消费描述数据
//! - 描述数据由编译期派生宏生成，也可以手工构建

pub mod component;
pub mod descriptor;
pub mod errors;
pub mod metadata;
pub mod module;

pub use component::*;
pub use descriptor::*;
pub use errors::*;
pub use metadata::*;
pub use module::*;
