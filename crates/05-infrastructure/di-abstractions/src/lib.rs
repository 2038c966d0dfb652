//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件注册和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`ComponentRegistry`] - 组件注册表接口
//! - [`ComponentScanner`] - 组件扫描器接口
//! - [`ComponentResolver`] - 依赖解析器接口
//! - [`ComponentFactory`] - 组件工厂接口
//! - [`DiContainer`] - 依赖注入容器接口

pub mod container;
pub mod factory;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use container::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;
