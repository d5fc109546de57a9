//! Planetoid application: simulation state, tuning editor, and the winit
//! front-end that renders the planet.

pub mod editor;
pub mod frame_stats;
pub mod game_loop;
pub mod platform;
pub mod state;
pub mod window;
