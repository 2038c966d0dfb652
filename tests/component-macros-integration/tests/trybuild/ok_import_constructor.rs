use component_macros::Composable;
use infrastructure_common::Composable as _;

#[derive(Default)]
pub struct Clock;

#[derive(Composable)]
#[import_constructor]
pub struct Scheduler {
    #[inject]
    clock: Box<Clock>,
    #[import]
    fallback: Option<Box<Clock>>,
    retries: u32,
}

fn main() {
    let descriptor = Scheduler::descriptor();
    assert_eq!(descriptor.constructors()[0].parameters().len(), 1);
    assert_eq!(descriptor.properties().len(), 1);
}
