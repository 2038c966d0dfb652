//! 类型描述符
//!
//! 容器本身不做任何反射，只消费这里定义的描述数据：
//! 导出标记、导入属性、构造函数形态，以及类型实际实现的契约。
//! 描述符通常由 `#[derive(Composable)]` 在编译期生成，也可以用
//! [`TypeDescriptor::builder`] 手工构建。

use crate::component::Contract;
use crate::errors::{DependencyError, DependencyResult};
use crate::metadata::TypeInfo;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 类型擦除后的组件实例
///
/// 以类型 `K` 视图持有的实例内部总是一个 `Box<K>`，因此 `K` 既可以是
/// 具体类型，也可以是 `dyn Trait` 契约。
pub type Instance = Box<dyn Any>;

/// 将值包装为 `K` 视图的实例
pub fn into_instance<K: ?Sized + 'static>(value: Box<K>) -> Instance {
    Box::new(value)
}

/// 从实例中取出 `K` 视图的值
pub fn downcast_instance<K: ?Sized + 'static>(instance: Instance) -> DependencyResult<Box<K>> {
    instance
        .downcast::<Box<K>>()
        .map(|value| *value)
        .map_err(|_| DependencyError::type_mismatch(std::any::type_name::<K>()))
}

/// 以 `K` 视图可变借用实例
pub fn instance_mut<K: ?Sized + 'static>(instance: &mut dyn Any) -> DependencyResult<&mut K> {
    instance
        .downcast_mut::<Box<K>>()
        .map(|value| &mut **value)
        .ok_or_else(|| DependencyError::type_mismatch(std::any::type_name::<K>()))
}

/// 构造函数调用函数类型
pub type ConstructorFn = Arc<dyn Fn(Arguments) -> DependencyResult<Instance> + Send + Sync>;

/// 属性注入函数类型
pub type PropertyInjector = Arc<dyn Fn(&mut dyn Any, Instance) -> DependencyResult<()> + Send + Sync>;

/// 契约视图转换函数类型
pub type ViewConversion = Arc<dyn Fn(Instance) -> DependencyResult<Instance> + Send + Sync>;

/// 构造函数参数
///
/// 按参数声明顺序保存已解析的依赖实例。
pub struct Arguments {
    type_name: &'static str,
    values: std::vec::IntoIter<Instance>,
}

impl Arguments {
    /// 创建参数列表
    pub fn new(type_name: &'static str, values: Vec<Instance>) -> Self {
        Self {
            type_name,
            values: values.into_iter(),
        }
    }

    /// 取出下一个参数
    pub fn take<P: ?Sized + 'static>(&mut self) -> DependencyResult<Box<P>> {
        let value = self.values.next().ok_or_else(|| DependencyError::ComponentCreationFailed {
            type_name: self.type_name.to_string(),
            source: format!("缺少构造参数: {}", std::any::type_name::<P>()).into(),
        })?;
        downcast_instance::<P>(value)
    }

    /// 剩余参数数量
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

/// 构造函数描述
#[derive(Clone)]
pub struct ConstructorDescriptor {
    type_name: &'static str,
    parameters: Vec<TypeInfo>,
    invoke: ConstructorFn,
}

impl ConstructorDescriptor {
    /// 创建构造函数描述
    ///
    /// `parameters` 的顺序必须与 `constructor` 中 [`Arguments::take`] 的调用顺序一致。
    pub fn new<T, F>(parameters: Vec<TypeInfo>, constructor: F) -> Self
    where
        T: 'static,
        F: Fn(&mut Arguments) -> DependencyResult<T> + Send + Sync + 'static,
    {
        Self {
            type_name: std::any::type_name::<T>(),
            parameters,
            invoke: Arc::new(move |mut arguments: Arguments| -> DependencyResult<Instance> {
                let value = constructor(&mut arguments)?;
                if arguments.remaining() > 0 {
                    return Err(DependencyError::creation_failed(
                        arguments.type_name,
                        format!("构造函数未使用 {} 个已解析参数", arguments.remaining()),
                    ));
                }
                Ok(into_instance::<T>(Box::new(value)))
            }),
        }
    }

    /// 使用 `Default` 的无参构造函数
    pub fn default_of<T: Default + 'static>() -> Self {
        Self::new::<T, _>(Vec::new(), |_| Ok(T::default()))
    }

    /// 参数类型列表
    pub fn parameters(&self) -> &[TypeInfo] {
        &self.parameters
    }

    /// 是否为无参构造函数
    pub fn is_parameterless(&self) -> bool {
        self.parameters.is_empty()
    }

    /// 调用构造函数，返回具体类型视图的实例
    pub fn invoke(&self, arguments: Vec<Instance>) -> DependencyResult<Instance> {
        (self.invoke)(Arguments::new(self.type_name, arguments))
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("parameters", &self.parameters)
            .field("invoke", &"<function>")
            .finish()
    }
}

/// 导入属性描述
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: &'static str,
    property_type: TypeInfo,
    injector: PropertyInjector,
}

impl PropertyDescriptor {
    /// 创建导入属性描述
    ///
    /// `S` 是声明该属性的类型视图（具体类型或契约），`P` 是属性的声明类型。
    pub fn new<S, P, F>(name: &'static str, assign: F) -> Self
    where
        S: ?Sized + 'static,
        P: ?Sized + 'static,
        F: Fn(&mut S, Box<P>) + Send + Sync + 'static,
    {
        Self {
            name,
            property_type: TypeInfo::of::<P>(),
            injector: Arc::new(move |target: &mut dyn Any, value: Instance| -> DependencyResult<()> {
                let target = instance_mut::<S>(target)?;
                let value = downcast_instance::<P>(value)?;
                assign(target, value);
                Ok(())
            }),
        }
    }

    /// 属性名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 属性声明类型
    pub fn property_type(&self) -> &TypeInfo {
        &self.property_type
    }

    /// 将解析出的值赋给目标实例
    pub fn inject(&self, target: &mut dyn Any, value: Instance) -> DependencyResult<()> {
        (self.injector)(target, value)
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("property_type", &self.property_type.name)
            .finish()
    }
}

/// 契约绑定
///
/// 描述一个类型实际实现的契约：如何把具体实例转换为契约视图，
/// 以及契约自身声明的导入属性。
#[derive(Clone)]
pub struct ContractBinding {
    contract: TypeInfo,
    convert: ViewConversion,
    imports: Vec<PropertyDescriptor>,
}

impl ContractBinding {
    /// 为 `C: I` 创建契约绑定
    pub fn new<C, I, F>(upcast: F) -> Self
    where
        C: 'static,
        I: ?Sized + Contract,
        F: Fn(Box<C>) -> Box<I> + Send + Sync + 'static,
    {
        Self {
            contract: TypeInfo::of::<I>(),
            convert: Arc::new(move |instance: Instance| -> DependencyResult<Instance> {
                let concrete = downcast_instance::<C>(instance)?;
                Ok(into_instance::<I>(upcast(concrete)))
            }),
            imports: I::imports(),
        }
    }

    /// 类型以自身身份作为契约
    pub fn identity(type_info: TypeInfo, imports: Vec<PropertyDescriptor>) -> Self {
        Self {
            contract: type_info,
            convert: Arc::new(|instance: Instance| -> DependencyResult<Instance> { Ok(instance) }),
            imports,
        }
    }

    /// 契约类型
    pub fn contract(&self) -> &TypeInfo {
        &self.contract
    }

    /// 契约声明的导入属性
    pub fn imports(&self) -> &[PropertyDescriptor] {
        &self.imports
    }

    /// 将具体类型视图的实例转换为契约视图
    pub fn convert(&self, instance: Instance) -> DependencyResult<Instance> {
        (self.convert)(instance)
    }
}

impl fmt::Debug for ContractBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractBinding")
            .field("contract", &self.contract.name)
            .field("imports", &self.imports)
            .finish()
    }
}

/// 导出标记
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportMarker {
    /// 声明的契约类型，`None` 表示以自身导出
    pub contract: Option<TypeInfo>,
}

/// 类型描述符
#[derive(Clone)]
pub struct TypeDescriptor {
    type_info: TypeInfo,
    constructors: Vec<ConstructorDescriptor>,
    properties: Vec<PropertyDescriptor>,
    export: Option<ExportMarker>,
    import_constructor: bool,
    implements: Vec<ContractBinding>,
}

impl TypeDescriptor {
    /// 创建描述符构建器
    pub fn builder<T: 'static>() -> TypeDescriptorBuilder<T> {
        TypeDescriptorBuilder {
            descriptor: Self {
                type_info: TypeInfo::of::<T>(),
                constructors: Vec::new(),
                properties: Vec::new(),
                export: None,
                import_constructor: false,
                implements: Vec::new(),
            },
            _marker: PhantomData,
        }
    }

    /// 类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 声明的构造函数
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// 导入属性
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// 导出标记
    pub fn export(&self) -> Option<&ExportMarker> {
        self.export.as_ref()
    }

    /// 是否带有导入构造函数标记
    pub fn has_import_constructor(&self) -> bool {
        self.import_constructor
    }

    /// 实际实现的契约
    pub fn implements(&self) -> &[ContractBinding] {
        &self.implements
    }

    /// 是否带有至少一个组合标记
    pub fn is_composable(&self) -> bool {
        self.export.is_some() || !self.properties.is_empty() || self.import_constructor
    }

    /// 查找指定契约的绑定
    pub fn binding_for(&self, contract: &TypeInfo) -> Option<&ContractBinding> {
        self.implements.iter().find(|binding| binding.contract() == contract)
    }

    /// 以自身身份作为契约的绑定
    pub fn identity_binding(&self) -> ContractBinding {
        ContractBinding::identity(self.type_info, self.properties.clone())
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_info", &self.type_info.name)
            .field("constructors", &self.constructors)
            .field("properties", &self.properties)
            .field("export", &self.export)
            .field("import_constructor", &self.import_constructor)
            .field("implements", &self.implements)
            .finish()
    }
}

/// 类型描述符构建器
pub struct TypeDescriptorBuilder<T> {
    descriptor: TypeDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> TypeDescriptorBuilder<T> {
    /// 添加构造函数
    pub fn constructor<F>(mut self, parameters: Vec<TypeInfo>, constructor: F) -> Self
    where
        F: Fn(&mut Arguments) -> DependencyResult<T> + Send + Sync + 'static,
    {
        self.descriptor
            .constructors
            .push(ConstructorDescriptor::new::<T, F>(parameters, constructor));
        self
    }

    /// 添加导入属性
    pub fn import<P, F>(mut self, name: &'static str, assign: F) -> Self
    where
        P: ?Sized + 'static,
        F: Fn(&mut T, Box<P>) + Send + Sync + 'static,
    {
        self.descriptor
            .properties
            .push(PropertyDescriptor::new::<T, P, F>(name, assign));
        self
    }

    /// 以自身导出
    pub fn export(mut self) -> Self {
        self.descriptor.export = Some(ExportMarker { contract: None });
        self
    }

    /// 以指定契约导出
    pub fn export_as<I: ?Sized + 'static>(mut self) -> Self {
        self.descriptor.export = Some(ExportMarker {
            contract: Some(TypeInfo::of::<I>()),
        });
        self
    }

    /// 标记导入构造函数
    pub fn import_constructor(mut self) -> Self {
        self.descriptor.import_constructor = true;
        self
    }

    /// 声明实现的契约
    pub fn implements<I, F>(mut self, upcast: F) -> Self
    where
        I: ?Sized + Contract,
        F: Fn(Box<T>) -> Box<I> + Send + Sync + 'static,
    {
        self.descriptor
            .implements
            .push(ContractBinding::new::<T, I, F>(upcast));
        self
    }

    /// 完成构建
    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}

impl<T: Default + 'static> TypeDescriptorBuilder<T> {
    /// 添加使用 `Default` 的无参构造函数
    pub fn default_constructor(mut self) -> Self {
        self.descriptor
            .constructors
            .push(ConstructorDescriptor::default_of::<T>());
        self
    }
}
