pub mod dispatch;
pub mod line;
pub mod mission;
pub mod params;
pub mod scan;
pub mod sna;
pub mod system;
pub mod telemetry;

pub use dispatch::*;
pub use line::*;
pub use scan::*;
