mod color;

pub use color::{grey, hex_to_linear, srgb_to_linear};
