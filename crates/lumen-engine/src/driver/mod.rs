//! Native graphics driver seam.
//!
//! This module is responsible for:
//! - the [`Driver`] trait the core is generic over
//! - opaque display/config/context/surface handles
//! - the per-context instanced-drawing capability table
//! - GL enum values the core inspects
//! - an in-memory [`SoftwareDriver`] used for headless runs and tests

mod api;
pub mod gl;
mod software;

pub use api::{
    CLIENT_VERSION, ConfigHandle, ConfigRequest, ContextHandle, DisplayHandle, Driver,
    InstancedArrays, SurfaceHandle, SurfaceKind,
};
pub use software::{AttribPointer, SoftwareDriver, SoftwareOptions, Upload};
