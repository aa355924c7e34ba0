//! Client pixel unpacking.
//!
//! The driver only understands tightly described client memory. WebGL adds
//! vertical flipping and alpha premultiplication on upload; this module
//! applies them (plus row alignment padding) before the driver sees the data.

mod store;
mod transform;

pub use store::{PixelFormat, PixelStore, PixelType};
pub use transform::{
    PACKED_5551_ZERO_ALPHA, UnpackError, pixel_size, prepare, required_len, unpack,
};
