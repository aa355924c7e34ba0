//! Per-context bookkeeping of driver-allocated GPU objects.

mod registry;

pub use registry::{GpuObject, ObjectKind, ObjectRegistry};
