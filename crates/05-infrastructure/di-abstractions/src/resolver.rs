//! 组件解析器抽象接口
//!
//! 提供依赖解析和组件实例化的能力

use crate::container::ContainerConfig;
use infrastructure_common::{downcast_instance, DependencyError, DependencyResult, Instance, TypeInfo};

/// 组件解析器 trait
///
/// 负责解析组件依赖并创建组件实例。每次解析都会创建新实例。
pub trait ComponentResolver {
    /// 在给定的解析上下文中解析请求类型，返回请求类型视图的实例
    fn resolve_in(
        &self,
        requested: &TypeInfo,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance>;

    /// 创建新的解析上下文
    fn new_context(&self) -> ResolveContext;

    /// 解析指定类型（使用 TypeInfo）
    fn resolve_by_type(&self, requested: &TypeInfo) -> DependencyResult<Instance> {
        let mut context = self.new_context();
        self.resolve_in(requested, &mut context)
    }

    /// 解析指定类型的组件
    ///
    /// `T` 可以是具体类型，也可以是 `dyn Trait` 契约。
    fn resolve<T>(&self) -> DependencyResult<Box<T>>
    where
        T: ?Sized + 'static,
        Self: Sized,
    {
        downcast_instance::<T>(self.resolve_by_type(&TypeInfo::of::<T>())?)
    }
}

/// 解析上下文
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    resolution_chain: Vec<TypeInfo>,
    /// 是否检测循环依赖
    detect_cycles: bool,
    /// 最大解析深度
    max_depth: usize,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(config: &ContainerConfig) -> Self {
        Self {
            resolution_chain: Vec::new(),
            detect_cycles: config.enable_circular_dependency_detection,
            max_depth: config.max_resolution_depth,
        }
    }

    /// 添加类型到解析链
    pub fn push_type(&mut self, type_info: TypeInfo) -> DependencyResult<()> {
        if self.detect_cycles && self.resolution_chain.contains(&type_info) {
            return Err(DependencyError::CircularDependency {
                dependency_chain: self.describe_chain(&type_info),
            });
        }
        if self.resolution_chain.len() >= self.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                type_name: type_info.name.to_string(),
                max_depth: self.max_depth,
            });
        }
        self.resolution_chain.push(type_info);
        Ok(())
    }

    /// 从解析链中移除类型
    pub fn pop_type(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    /// 当前解析链
    pub fn chain(&self) -> &[TypeInfo] {
        &self.resolution_chain
    }

    fn describe_chain(&self, next: &TypeInfo) -> String {
        self.resolution_chain
            .iter()
            .chain(std::iter::once(next))
            .map(TypeInfo::short_name)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new(&ContainerConfig::default())
    }
}
