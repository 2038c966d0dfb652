//! # Component Macros
//!
//! 这个 crate 提供在编译期生成类型描述符的派生宏。
//!
//! ## 核心宏
//!
//! - [`Composable`](derive@Composable) - 根据组合标记生成 `TypeDescriptor`
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::Composable;
//! use infrastructure_common::Contract;
//!
//! pub trait Greeter {
//!     fn greet(&self) -> String;
//! }
//!
//! impl Contract for dyn Greeter {}
//!
//! #[derive(Composable)]
//! #[export(contract = dyn Greeter)]
//! #[import_constructor]
//! pub struct ConsoleGreeter {
//!     #[inject]
//!     clock: Box<Clock>,
//!     #[import]
//!     logger: Option<Box<dyn Logger>>,
//!     greeting: String,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod composable;
mod utils;

/// 可组合类型派生宏
///
/// 为结构体实现 `Composable` 与 `Contract`。
///
/// # 结构体属性
///
/// - `#[export]` - 以自身导出
/// - `#[export(contract = dyn Trait)]` - 以契约导出，同时生成到该契约的绑定
/// - `#[implements(dyn A, dyn B)]` - 额外声明实现的契约，供显式契约注册使用
/// - `#[import_constructor]` - 构造函数按声明顺序接收所有 `#[inject]` 字段
///
/// # 字段属性
///
/// - `#[inject]` - 构造函数参数，字段类型必须是 `Box<T>`
/// - `#[import]` - 导入属性，字段类型必须是 `Option<Box<T>>`，构造后由容器赋值
///
/// 其余字段使用 `Default::default()` 初始化。
#[proc_macro_derive(Composable, attributes(export, implements, import_constructor, inject, import))]
pub fn derive_composable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    composable::derive_composable_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
