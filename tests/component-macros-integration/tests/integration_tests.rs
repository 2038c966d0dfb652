//! Centralized integration tests for component-macros crate

use component_macros::Composable;
use infrastructure_common::{
    downcast_instance, into_instance, Composable as _, Contract, TypeInfo,
};

pub trait Store {
    fn name(&self) -> &'static str;
}

impl Contract for dyn Store {}

pub trait Audited {}

impl Contract for dyn Audited {}

#[derive(Debug, Default, PartialEq)]
pub struct Clock(u64);

#[derive(Debug, Composable)]
#[export(contract = dyn Store)]
#[implements(dyn Audited)]
pub struct DiskStore {
    path: String,
}

impl Store for DiskStore {
    fn name(&self) -> &'static str {
        "disk"
    }
}

impl Audited for DiskStore {}

#[derive(Debug, Composable)]
#[import_constructor]
pub struct Scheduler {
    #[inject]
    clock: Box<Clock>,
    #[import]
    backup: Option<Box<Clock>>,
    retries: u32,
}

#[derive(Composable)]
pub struct Standalone {
    #[import]
    store: Option<Box<dyn Store>>,
}

#[test]
fn test_export_contract_descriptor() {
    let descriptor = DiskStore::descriptor();

    assert!(descriptor.type_info().is::<DiskStore>());
    assert_eq!(
        descriptor.export().and_then(|marker| marker.contract),
        Some(TypeInfo::of::<dyn Store>())
    );
    assert!(!descriptor.has_import_constructor());
    assert!(descriptor.properties().is_empty());

    let contracts: Vec<_> = descriptor
        .implements()
        .iter()
        .map(|binding| *binding.contract())
        .collect();
    assert_eq!(
        contracts,
        vec![TypeInfo::of::<dyn Store>(), TypeInfo::of::<dyn Audited>()]
    );
}

#[test]
fn test_default_constructor_uses_field_defaults() {
    let descriptor = DiskStore::descriptor();
    assert_eq!(descriptor.constructors().len(), 1);

    let constructor = &descriptor.constructors()[0];
    assert!(constructor.is_parameterless());

    let instance = constructor.invoke(Vec::new()).unwrap();
    let store = downcast_instance::<DiskStore>(instance).unwrap();
    assert!(store.path.is_empty());
}

#[test]
fn test_binding_converts_to_contract_view() {
    let descriptor = DiskStore::descriptor();
    let binding = descriptor
        .binding_for(&TypeInfo::of::<dyn Store>())
        .unwrap();

    let instance = descriptor.constructors()[0].invoke(Vec::new()).unwrap();
    let store = downcast_instance::<dyn Store>(binding.convert(instance).unwrap()).unwrap();
    assert_eq!(store.name(), "disk");
}

#[test]
fn test_import_constructor_descriptor() {
    let descriptor = Scheduler::descriptor();

    assert!(descriptor.has_import_constructor());
    assert!(descriptor.export().is_none());
    assert!(descriptor.is_composable());

    let constructor = &descriptor.constructors()[0];
    assert_eq!(constructor.parameters(), &[TypeInfo::of::<Clock>()]);

    let instance = constructor
        .invoke(vec![into_instance::<Clock>(Box::new(Clock(42)))])
        .unwrap();
    let mut scheduler = downcast_instance::<Scheduler>(instance).unwrap();
    assert_eq!(*scheduler.clock, Clock(42));
    assert!(scheduler.backup.is_none());
    assert_eq!(scheduler.retries, 0);

    let property = &descriptor.properties()[0];
    assert_eq!(property.name(), "backup");
    let mut view = into_instance::<Scheduler>(scheduler);
    property
        .inject(&mut *view, into_instance::<Clock>(Box::new(Clock(7))))
        .unwrap();
    scheduler = downcast_instance::<Scheduler>(view).unwrap();
    assert_eq!(scheduler.backup.as_deref(), Some(&Clock(7)));
}

#[test]
fn test_import_marker_alone_makes_type_composable() {
    let descriptor = Standalone::descriptor();
    assert!(descriptor.is_composable());
    assert!(descriptor.export().is_none());
    assert_eq!(
        *descriptor.properties()[0].property_type(),
        TypeInfo::of::<dyn Store>()
    );
    assert_eq!(Standalone::imports().len(), 1);
}
