//! Camera control around a single planet centred at the origin.

pub mod movement;
pub mod orbit_camera;

pub use movement::MoveInput;
pub use orbit_camera::{CameraMode, CameraSettings, OrbitCamera, PITCH_LIMIT_DEGREES, projection};
