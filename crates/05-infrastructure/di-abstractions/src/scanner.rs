//! 组件扫描器抽象接口
//!
//! 从模块中挑选需要注册的类型

use infrastructure_common::{Module, TypeDescriptor};

/// 组件扫描器 trait
pub trait ComponentScanner {
    /// 扫描模块，按模块中的顺序返回需要注册的类型
    fn scan<'a>(&self, module: &'a Module) -> Vec<&'a TypeDescriptor>;

    /// 获取扫描器名称
    fn name(&self) -> &str;
}

/// 组合标记扫描器
///
/// 只保留至少带有一个组合标记的类型：导出标记、导入属性或导入构造函数标记。
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkerScanner;

impl ComponentScanner for MarkerScanner {
    fn scan<'a>(&self, module: &'a Module) -> Vec<&'a TypeDescriptor> {
        module
            .types()
            .iter()
            .filter(|descriptor| descriptor.is_composable())
            .collect()
    }

    fn name(&self) -> &str {
        "marker"
    }
}
