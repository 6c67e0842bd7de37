pub mod resolver;
pub mod types;

pub use resolver::{resolve, CollisionResolver};
pub use types::{Circle, DegenerateGeometry, Layout, LocatedPoint};
