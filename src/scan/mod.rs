mod component;
mod scanner;
mod visited;

pub use component::Component;
pub use scanner::{Components, Scanner, scan};
