pub mod fruit;
pub mod selector;
