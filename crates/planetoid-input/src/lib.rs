//! Frame-coherent keyboard and mouse state over winit events.

pub mod keyboard;
pub mod mouse;

pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::{CursorMode, MouseState};
