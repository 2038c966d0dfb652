//! 组件注册表抽象接口

use infrastructure_common::{Composable, DependencyResult, Module, TypeDescriptor, TypeInfo};
use std::any::TypeId;

/// 组件注册表 trait
///
/// 注册只追加，不提供移除操作。注册不是事务性的：一批类型中后面的
/// 类型注册失败时，前面已注册的类型保持注册状态。
pub trait ComponentRegistry {
    /// 注册模块中所有带组合标记的类型，返回注册的类型数量
    ///
    /// 同一个模块只能注册一次。
    fn register_module(&mut self, module: &Module) -> DependencyResult<usize>;

    /// 注册类型，契约由类型自身的导出标记推断
    fn register_type(&mut self, descriptor: TypeDescriptor) -> DependencyResult<()>;

    /// 以指定契约注册类型，并同时以自身身份注册
    fn register_type_as(
        &mut self,
        descriptor: TypeDescriptor,
        contract: TypeInfo,
    ) -> DependencyResult<()>;

    /// 以契约 `I` 注册类型描述符
    fn register_type_as_contract<I>(&mut self, descriptor: TypeDescriptor) -> DependencyResult<()>
    where
        I: ?Sized + 'static,
        Self: Sized,
    {
        self.register_type_as(descriptor, TypeInfo::of::<I>())
    }

    /// 注册可组合类型
    fn register<T>(&mut self) -> DependencyResult<()>
    where
        T: Composable,
        Self: Sized,
    {
        self.register_type(T::descriptor())
    }

    /// 以契约 `I` 注册可组合类型
    fn register_as<T, I>(&mut self) -> DependencyResult<()>
    where
        T: Composable,
        I: ?Sized + 'static,
        Self: Sized,
    {
        self.register_type_as(T::descriptor(), TypeInfo::of::<I>())
    }

    /// 检查契约是否已注册
    fn is_registered<T>(&self) -> bool
    where
        T: ?Sized + 'static,
        Self: Sized,
    {
        self.is_registered_by_type_id(TypeId::of::<T>())
    }

    /// 检查契约是否已注册（通过 TypeId）
    fn is_registered_by_type_id(&self, type_id: TypeId) -> bool;

    /// 获取所有已注册的 (契约, 具体类型) 映射
    fn get_registered_contracts(&self) -> Vec<(TypeInfo, TypeInfo)>;
}
