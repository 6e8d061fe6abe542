//! Provider ordering and selection.

pub mod priority;
pub mod selector;

pub use priority::ModelPriority;
pub use selector::{Selector, select_from};
