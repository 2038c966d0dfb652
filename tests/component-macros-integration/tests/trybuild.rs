//! trybuild compile-time tests for component_macros

#[test]
fn trybuild_composable_derive() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/ok_composable.rs");
    t.pass("tests/trybuild/ok_import_constructor.rs");
}
