pub mod global;

pub use global::{AppResult, LazyRecError};
