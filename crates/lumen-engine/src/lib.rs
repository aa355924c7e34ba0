//! Lumen engine crate.
//!
//! Off-screen WebGL-style rendering contexts on top of an EGL-like native
//! driver. Layers, bottom up:
//! - [`driver`]: the native seam and an in-memory software implementation
//! - [`display`]: the shared display connection
//! - [`unpack`]: client pixel transforms applied before uploads
//! - [`objects`] and [`error`]: per-context bookkeeping
//! - [`context`]: contexts, the manager, and the per-context command surface

pub mod context;
pub mod display;
pub mod driver;
pub mod error;
pub mod logging;
pub mod objects;
pub mod unpack;

pub use context::{ContextAttributes, ContextId, ContextManager, ContextState, GlCtx};
pub use driver::{Driver, SoftwareDriver, SoftwareOptions};
pub use error::{Error, Result};
pub use unpack::PixelStore;
