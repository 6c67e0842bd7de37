pub mod catalog;
pub mod detector;
pub mod types;

pub use catalog::{precision, AspectCatalog};
pub use detector::AspectDetector;
pub use types::{Aspect, AspectMatch};
