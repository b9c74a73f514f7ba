//! Ленивая запись и фасады над ней.

pub mod facade;
pub mod lazy;
pub mod persist;
pub mod registry;

pub use facade::*;
pub use lazy::*;
pub use persist::*;
pub use registry::*;
