//! Common types shared across keydoc: values, locks and constants.

mod constants;
mod lock;
mod value;

pub use constants::*;
pub use lock::*;
pub use value::*;
