pub mod aspects;
pub mod chart;
pub mod config;
pub mod dignities;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod points;

pub use aspects::{Aspect, AspectCatalog, AspectDetector, AspectMatch};
pub use chart::{ChartData, ChartFrame, RadixChart, TransitChart};
pub use config::{AspectSettings, ChartSettings};
pub use dignities::{Dignity, DignityType, ExactExaltation};
pub use error::{ConfigError, ValidationError};
pub use geometry::{angular_separation, normalize, project_on_circle, Point2};
pub use layout::{resolve, Circle, CollisionResolver, DegenerateGeometry, Layout, LocatedPoint};
pub use points::{Point, PointSet};
