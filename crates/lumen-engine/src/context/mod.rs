//! Off-screen contexts and the manager that arbitrates which one is current.

mod attributes;
mod gl_ctx;
mod manager;
mod native;
mod state;

pub use attributes::{ContextAttributes, PowerPreference};
pub use gl_ctx::GlCtx;
pub use manager::ContextManager;
pub use state::{ContextId, ContextState};
