//! Centralized integration tests for di-impl crate, wired through `#[derive(Composable)]`
use component_macros::Composable;
use di_abstractions::{ComponentRegistry, ComponentResolver, ContainerBuilder, DiContainer};
use di_impl::DiContainerImpl;
use infrastructure_common::{Contract, DependencyError, Module, PropertyDescriptor};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_SERIAL: AtomicUsize = AtomicUsize::new(1);

/// 每个实例带唯一序号
#[derive(Debug)]
struct Serial(usize);

impl Default for Serial {
    fn default() -> Self {
        Self(NEXT_SERIAL.fetch_add(1, Ordering::Relaxed))
    }
}

pub trait Repository {
    fn find(&self, key: &str) -> Option<String>;
}

impl Contract for dyn Repository {}

pub trait Logger {
    fn log(&self, message: &str) -> String;
}

impl Contract for dyn Logger {}

/// 契约上声明了 logger 导入属性
pub trait Notifier {
    fn notify(&self, message: &str) -> String;
    fn set_logger(&mut self, logger: Box<dyn Logger>);
}

impl Contract for dyn Notifier {
    fn imports() -> Vec<PropertyDescriptor> {
        vec![PropertyDescriptor::new::<dyn Notifier, dyn Logger, _>(
            "logger",
            |notifier, logger| notifier.set_logger(logger),
        )]
    }
}

#[derive(Debug, Composable)]
#[export]
struct Clock {
    serial: Serial,
}

#[derive(Debug, Composable)]
#[export(contract = dyn Repository)]
struct MemoryRepository {
    serial: Serial,
}

impl Repository for MemoryRepository {
    fn find(&self, key: &str) -> Option<String> {
        (key == "greeting").then(|| "hello".to_string())
    }
}

#[derive(Composable)]
#[export(contract = dyn Logger)]
struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) -> String {
        format!("[console] {message}")
    }
}

#[derive(Composable)]
#[import_constructor]
struct GreetingService {
    #[inject]
    repository: Box<dyn Repository>,
    #[inject]
    clock: Box<Clock>,
    #[import]
    logger: Option<Box<dyn Logger>>,
    greeted: u32,
}

impl GreetingService {
    fn greet(&mut self) -> String {
        self.greeted += 1;
        let greeting = self.repository.find("greeting").unwrap_or_default();
        match &self.logger {
            Some(logger) => logger.log(&greeting),
            None => greeting,
        }
    }
}

/// 自身额外声明了 clock 导入属性，契约上没有
#[derive(Composable)]
#[export(contract = dyn Notifier)]
struct EmailNotifier {
    #[import]
    clock: Option<Box<Clock>>,
    logger: Option<Box<dyn Logger>>,
}

impl Notifier for EmailNotifier {
    fn notify(&self, message: &str) -> String {
        let logged = self
            .logger
            .as_ref()
            .map_or_else(|| message.to_string(), |logger| logger.log(message));
        match &self.clock {
            Some(clock) => format!("{logged} @{}", clock.serial.0),
            None => logged,
        }
    }

    fn set_logger(&mut self, logger: Box<dyn Logger>) {
        self.logger = Some(logger);
    }
}

#[derive(Composable)]
#[export]
#[implements(dyn Repository)]
struct SqlRepository;

impl Repository for SqlRepository {
    fn find(&self, _key: &str) -> Option<String> {
        None
    }
}

#[derive(Composable)]
struct Unmarked;

fn core_module() -> Module {
    Module::new("core")
        .with_composable::<Clock>()
        .with_composable::<MemoryRepository>()
        .with_composable::<ConsoleLogger>()
        .with_composable::<GreetingService>()
        .with_composable::<Unmarked>()
}

#[test]
fn test_module_registration_skips_unmarked_types() {
    let mut container = DiContainerImpl::new();
    let registered = container.register_module(&core_module()).unwrap();

    assert_eq!(registered, 4);
    assert!(container.is_registered::<Clock>());
    assert!(container.is_registered::<dyn Repository>());
    assert!(container.is_registered::<dyn Logger>());
    assert!(container.is_registered::<GreetingService>());
    assert!(!container.is_registered::<Unmarked>());
}

#[test]
fn test_parameterless_types_resolve_to_new_instances() {
    let mut container = DiContainerImpl::new();
    container.register::<Clock>().unwrap();

    let first = container.resolve::<Clock>().unwrap();
    let second = container.resolve::<Clock>().unwrap();
    assert_ne!(first.serial.0, second.serial.0);
}

#[test]
fn test_constructor_and_property_injection() {
    let container = DiContainerImpl::builder()
        .add_module(core_module())
        .build()
        .unwrap();

    let mut service = container.resolve::<GreetingService>().unwrap();
    assert_eq!(service.greet(), "[console] hello");
    assert_eq!(service.greeted, 1);

    let other = container.resolve::<GreetingService>().unwrap();
    assert_ne!(service.clock.serial.0, other.clock.serial.0);
    assert_eq!(other.greeted, 0);
}

#[test]
fn test_registering_module_twice_fails() {
    let mut container = DiContainerImpl::new();
    let module = core_module();
    container.register_module(&module).unwrap();

    assert!(matches!(
        container.register_module(&module),
        Err(DependencyError::DuplicateModule { .. })
    ));
    assert_eq!(container.stats().registered_modules, 1);
}

#[test]
fn test_second_exporter_of_contract_fails() {
    let mut container = DiContainerImpl::new();
    container.register::<MemoryRepository>().unwrap();

    assert!(matches!(
        container.register_as::<SqlRepository, dyn Repository>(),
        Err(DependencyError::DuplicateContract { .. })
    ));
    // 显式契约先插入契约键，失败后自身身份不会被注册
    assert!(!container.is_registered::<SqlRepository>());
}

#[test]
fn test_contract_surface_drives_property_injection() {
    let mut container = DiContainerImpl::new();
    container.register::<Clock>().unwrap();
    container.register::<ConsoleLogger>().unwrap();
    container.register_as::<EmailNotifier, dyn Notifier>().unwrap();

    // 通过契约请求：只注入契约声明的 logger，不注入实现自身声明的 clock
    let notifier = container.resolve::<dyn Notifier>().unwrap();
    assert_eq!(notifier.notify("sent"), "[console] sent");

    // 通过具体类型请求：只注入自身声明的 clock
    let concrete = container.resolve::<EmailNotifier>().unwrap();
    assert!(concrete.clock.is_some());
    assert!(concrete.logger.is_none());
}

/// 以契约导出，自身声明了 clock 导入属性
#[derive(Composable)]
#[export(contract = dyn Repository)]
struct AuditedRepository {
    #[import]
    clock: Option<Box<Clock>>,
}

impl Repository for AuditedRepository {
    fn find(&self, key: &str) -> Option<String> {
        self.clock.as_ref().map(|clock| format!("{key}@{}", clock.serial.0))
    }
}

#[test]
fn test_exported_type_resolves_through_contract_and_itself() {
    let module = Module::new("audited")
        .with_composable::<Clock>()
        .with_composable::<AuditedRepository>();
    let mut container = DiContainerImpl::new();
    assert_eq!(container.register_module(&module).unwrap(), 2);

    // 契约上没有声明 clock，因此不注入
    let repository = container.resolve::<dyn Repository>().unwrap();
    assert_eq!(repository.find("greeting"), None);

    let concrete = container.resolve::<AuditedRepository>().unwrap();
    assert!(concrete.clock.is_some());
}

#[test]
fn test_explicit_contract_registers_both_keys() {
    let mut container = DiContainerImpl::new();
    container.register_as::<SqlRepository, dyn Repository>().unwrap();

    assert!(container.resolve::<SqlRepository>().is_ok());
    let repository = container.resolve::<dyn Repository>().unwrap();
    assert_eq!(repository.find("greeting"), None);
}

#[test]
fn test_missing_dependency_surfaces_unregistered_type() {
    let mut container = DiContainerImpl::new();
    container.register::<Clock>().unwrap();
    container.register::<GreetingService>().unwrap();

    match container.resolve::<GreetingService>() {
        Err(DependencyError::UnregisteredType { type_name }) => {
            assert!(type_name.contains("Repository"));
        }
        Ok(_) => panic!("缺少依赖时解析应当失败"),
        Err(other) => panic!("意外的错误: {other:?}"),
    }
}
