//! # 依赖注入具体实现
//!
//! 提供具体的依赖注入容器和容器构建器实现。
//!
//! 容器由三张表组成：已注册模块、契约映射（契约 → 具体类型）、
//! 工厂映射（具体类型 → 延迟构造工厂）。注册阶段只追加，
//! 解析阶段按 契约查找 → 调用工厂 → 属性注入 的顺序递归进行。
//!
//! 属性注入使用的是**请求类型**声明的导入属性，而不是具体类型的：
//! 通过 `dyn Trait` 请求时，具体实现上额外声明的导入属性不会被注入。

use di_abstractions::{
    ComponentFactory, ComponentRegistry, ComponentResolver, ComponentScanner, ConstructorFactory,
    ContainerBuilder, ContainerConfig, ContainerStats, DiContainer, MarkerScanner, ResolveContext,
};
use infrastructure_common::{
    ContractBinding, DependencyError, DependencyResult, Instance, Module, TypeDescriptor, TypeInfo,
};
use std::any::TypeId;
use std::cell::Cell;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 契约映射项
struct ContractEntry {
    /// 满足契约的具体类型
    concrete: TypeInfo,
    /// 具体类型到契约视图的绑定
    binding: ContractBinding,
}

/// 具体的依赖注入容器实现
///
/// 单线程使用：容器独占自己的映射表，不提供任何加锁。
pub struct DiContainerImpl {
    /// 容器配置
    config: ContainerConfig,
    /// 模块扫描器
    scanner: Box<dyn ComponentScanner>,
    /// 已注册模块
    modules: HashSet<Uuid>,
    /// 契约映射
    contracts: HashMap<TypeId, ContractEntry>,
    /// 工厂映射
    factories: HashMap<TypeId, Box<dyn ComponentFactory>>,
    /// 成功解析的顶层请求数量
    resolved: Cell<usize>,
}

impl DiContainerImpl {
    /// 创建新的容器
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建容器
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            config,
            scanner: Box::new(MarkerScanner),
            modules: HashSet::new(),
            contracts: HashMap::new(),
            factories: HashMap::new(),
            resolved: Cell::new(0),
        }
    }

    /// 创建容器构建器
    pub fn builder() -> DiContainerBuilder {
        DiContainerBuilder::new()
    }

    /// 注册前校验：最多一个构造函数，导入属性不能直接引用声明类型自身
    fn validate(descriptor: &TypeDescriptor) -> DependencyResult<()> {
        let type_info = descriptor.type_info();

        let count = descriptor.constructors().len();
        if count > 1 {
            return Err(DependencyError::MultipleConstructors {
                type_name: type_info.name.to_string(),
                count,
            });
        }

        if let Some(property) = descriptor
            .properties()
            .iter()
            .find(|property| property.property_type() == type_info)
        {
            return Err(DependencyError::SelfReferentialProperty {
                type_name: type_info.name.to_string(),
                property: property.name().to_string(),
            });
        }

        Ok(())
    }

    fn insert_contract(
        &mut self,
        concrete: &TypeInfo,
        binding: ContractBinding,
    ) -> DependencyResult<()> {
        let contract = *binding.contract();
        match self.contracts.entry(contract.id) {
            Entry::Occupied(existing) => Err(DependencyError::DuplicateContract {
                contract: contract.name.to_string(),
                existing: existing.get().concrete.name.to_string(),
                rejected: concrete.name.to_string(),
            }),
            Entry::Vacant(slot) => {
                debug!("契约映射: {} -> {}", contract.short_name(), concrete.short_name());
                slot.insert(ContractEntry {
                    concrete: *concrete,
                    binding,
                });
                Ok(())
            }
        }
    }

    fn insert_factory(&mut self, descriptor: &TypeDescriptor) {
        let type_info = descriptor.type_info();
        if self.factories.contains_key(&type_info.id) {
            debug!("复用已有工厂: {}", type_info.short_name());
            return;
        }

        match ConstructorFactory::from_descriptor(descriptor) {
            Some(factory) => {
                debug!(
                    "构建工厂: {} ({:?}, {} 个构造参数)",
                    factory.component_type().short_name(),
                    factory.kind(),
                    factory.dependencies().len()
                );
                self.factories.insert(type_info.id, Box::new(factory));
            }
            None => warn!("类型没有可用的构造函数，解析时将失败: {}", type_info.name),
        }
    }

    fn resolve_requested(
        &self,
        requested: &TypeInfo,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        let entry = self
            .contracts
            .get(&requested.id)
            .ok_or_else(|| DependencyError::UnregisteredType {
                type_name: requested.name.to_string(),
            })?;
        let factory = self
            .factories
            .get(&entry.concrete.id)
            .ok_or_else(|| DependencyError::NoFactory {
                type_name: entry.concrete.name.to_string(),
            })?;

        if self.config.log_resolutions {
            debug!(
                "解析组件: {} -> {} (深度 {})",
                requested.short_name(),
                factory.component_type().short_name(),
                context.depth()
            );
        }

        let instance = factory.create(self, context)?;
        let mut instance = entry.binding.convert(instance)?;

        // 只注入请求类型上声明的导入属性
        for property in entry.binding.imports() {
            let value = self.resolve_in(property.property_type(), context)?;
            property.inject(&mut *instance, value)?;
        }

        Ok(instance)
    }
}

impl Default for DiContainerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DiContainerImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiContainerImpl")
            .field("config", &self.config)
            .field("scanner", &self.scanner.name())
            .field("modules", &self.modules.len())
            .field("contracts", &self.contracts.len())
            .field("factories", &self.factories.len())
            .finish()
    }
}

impl ComponentRegistry for DiContainerImpl {
    fn register_module(&mut self, module: &Module) -> DependencyResult<usize> {
        if !self.modules.insert(module.id()) {
            return Err(DependencyError::DuplicateModule {
                module: format!("{} ({})", module.name(), module.id()),
            });
        }
        info!("注册模块: {} ({} 个类型)", module.name(), module.types().len());

        let descriptors: Vec<TypeDescriptor> =
            self.scanner.scan(module).into_iter().cloned().collect();
        let skipped = module.types().len() - descriptors.len();
        if skipped > 0 {
            debug!("跳过 {} 个没有组合标记的类型", skipped);
        }

        let mut registered = 0;
        for descriptor in descriptors {
            if let Err(error) = self.register_type(descriptor) {
                if error.is_registration_error() {
                    warn!(
                        "模块 {} 注册中断，已注册的 {} 个类型保持有效: {}",
                        module.name(),
                        registered,
                        error
                    );
                }
                return Err(error);
            }
            registered += 1;
        }
        Ok(registered)
    }

    fn register_type(&mut self, descriptor: TypeDescriptor) -> DependencyResult<()> {
        Self::validate(&descriptor)?;
        let type_info = *descriptor.type_info();

        let declared = descriptor.export().and_then(|marker| marker.contract);
        let binding = match declared {
            Some(contract) => match descriptor.binding_for(&contract) {
                Some(binding) => binding.clone(),
                None => {
                    warn!(
                        "导出契约 {} 未被 {} 实现，改为以自身注册",
                        contract.name, type_info.name
                    );
                    descriptor.identity_binding()
                }
            },
            None => descriptor.identity_binding(),
        };

        info!("注册组件: {} 作为 {}", type_info.short_name(), binding.contract().short_name());
        let exported_as_contract = *binding.contract() != type_info;
        self.insert_contract(&type_info, binding)?;
        // 导出其他契约的类型同样可以按自身类型解析
        if exported_as_contract {
            self.insert_contract(&type_info, descriptor.identity_binding())?;
        }
        self.insert_factory(&descriptor);
        Ok(())
    }

    fn register_type_as(
        &mut self,
        descriptor: TypeDescriptor,
        contract: TypeInfo,
    ) -> DependencyResult<()> {
        Self::validate(&descriptor)?;
        let type_info = *descriptor.type_info();

        let binding = if contract == type_info {
            descriptor.identity_binding()
        } else {
            descriptor.binding_for(&contract).cloned().ok_or_else(|| {
                DependencyError::ContractNotImplemented {
                    type_name: type_info.name.to_string(),
                    contract: contract.name.to_string(),
                }
            })?
        };

        info!("注册组件: {} 作为 {}", type_info.short_name(), contract.short_name());
        self.insert_contract(&type_info, binding)?;
        self.insert_contract(&type_info, descriptor.identity_binding())?;
        self.insert_factory(&descriptor);
        Ok(())
    }

    fn is_registered_by_type_id(&self, type_id: TypeId) -> bool {
        self.contracts.contains_key(&type_id)
    }

    fn get_registered_contracts(&self) -> Vec<(TypeInfo, TypeInfo)> {
        let mut contracts: Vec<_> = self
            .contracts
            .values()
            .map(|entry| (*entry.binding.contract(), entry.concrete))
            .collect();
        contracts.sort_by_key(|(contract, _)| contract.name);
        contracts
    }
}

impl ComponentResolver for DiContainerImpl {
    fn resolve_in(
        &self,
        requested: &TypeInfo,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        context.push_type(*requested)?;
        let result = self.resolve_requested(requested, context);
        if let Err(error) = &result {
            if context.depth() > 1 {
                debug!("解析链 {} 中断: {}", describe_chain(context.chain()), error);
            }
        }
        context.pop_type();
        result
    }

    fn new_context(&self) -> ResolveContext {
        ResolveContext::new(&self.config)
    }

    fn resolve_by_type(&self, requested: &TypeInfo) -> DependencyResult<Instance> {
        let mut context = self.new_context();
        let result = self.resolve_in(requested, &mut context);
        match &result {
            Ok(_) => self.resolved.set(self.resolved.get() + 1),
            Err(error) => warn!("解析失败: {}: {}", requested.name, error),
        }
        result
    }
}

impl DiContainer for DiContainerImpl {
    fn config(&self) -> &ContainerConfig {
        &self.config
    }

    fn stats(&self) -> ContainerStats {
        ContainerStats {
            registered_modules: self.modules.len(),
            registered_contracts: self.contracts.len(),
            registered_factories: self.factories.len(),
            resolved_components: self.resolved.get(),
        }
    }
}

fn describe_chain(chain: &[TypeInfo]) -> String {
    chain
        .iter()
        .map(TypeInfo::short_name)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// 容器构建器实现
pub struct DiContainerBuilder {
    config: ContainerConfig,
    scanner: Option<Box<dyn ComponentScanner>>,
    modules: Vec<Module>,
    types: Vec<TypeDescriptor>,
}

impl DiContainerBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
            scanner: None,
            modules: Vec::new(),
            types: Vec::new(),
        }
    }
}

impl Default for DiContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder for DiContainerBuilder {
    type Container = DiContainerImpl;

    fn build(self) -> DependencyResult<Self::Container> {
        let mut container = DiContainerImpl::with_config(self.config);
        if let Some(scanner) = self.scanner {
            container.scanner = scanner;
        }

        for module in &self.modules {
            container.register_module(module)?;
        }
        for descriptor in self.types {
            container.register_type(descriptor)?;
        }

        info!(
            "构建容器完成，注册了 {} 个模块、{} 个契约",
            container.modules.len(),
            container.contracts.len()
        );
        Ok(container)
    }

    fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    fn add_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    fn add_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.types.push(descriptor);
        self
    }

    fn with_scanner(mut self, scanner: Box<dyn ComponentScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }
}
