use component_macros::Composable;
use infrastructure_common::{Composable as _, Contract};

pub trait Greeter {
    fn greet(&self) -> String;
}

impl Contract for dyn Greeter {}

#[derive(Composable)]
#[export(contract = dyn Greeter)]
pub struct ConsoleGreeter {
    greeting: String,
}

impl Greeter for ConsoleGreeter {
    fn greet(&self) -> String {
        self.greeting.clone()
    }
}

fn main() {
    let descriptor = ConsoleGreeter::descriptor();
    assert!(descriptor.is_composable());
}
