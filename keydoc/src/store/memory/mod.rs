mod module;
mod namespace;
mod store;

pub use module::*;
pub use namespace::*;
pub use store::*;
