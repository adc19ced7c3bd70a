pub mod bearing;
pub mod bearing_view;
pub mod heading;
pub mod sensor;

pub use bearing::{Bearing, BearingState, align};
pub use bearing_view::{BearingMonitor, BearingOutput, BearingView, CompassStatus};
pub use heading::{AxisConvention, Heading, HeadingFusion, MagneticSample};
pub use sensor::{SensorEvent, SensorSource};
