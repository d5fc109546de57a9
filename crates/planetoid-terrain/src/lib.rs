//! Planet shape model: layered noise parameters, the elevation field they
//! define, and the plain-text shape file format.

mod displacement;
mod noise_layer;
mod shape;
mod shape_io;

pub use displacement::{Displacement, displace, elevation_with, layer_value_with};
pub use noise_layer::{MAX_OCTAVES, NoiseLayer};
pub use shape::ShapeConfig;
pub use shape_io::{
    SavedShape, ShapeIoError, deserialize_shape, load_shape, load_shape_file, save_shape,
    serialize_shape,
};
