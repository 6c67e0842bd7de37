pub mod data;
pub mod frame;
pub mod radix;
pub mod transit;

pub use data::ChartData;
pub use frame::{
    AspectChord, AxisMark, ChartFrame, CuspLine, PointSymbol, RadixMetrics, Ring, Ruler,
    SignSector, Stroke, TextLabel, SIGNS,
};
pub use radix::RadixChart;
pub use transit::{TransitChart, TransitFrame, TransitMetrics};
