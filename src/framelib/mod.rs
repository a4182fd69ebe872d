pub mod mount;
pub mod sky;

pub use mount::{AxisCalibration, MotorAngles, MountCalibration, MountPosition};
pub use sky::{Equatorial, Horizontal, SkyPosition};
