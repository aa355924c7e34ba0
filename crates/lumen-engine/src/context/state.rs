use std::fmt;

/// Lifecycle state of a rendering context.
///
/// `Init -> Ok -> (Error | Destroyed)`. Rendering only succeeds in `Ok`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ContextState {
    Init,
    Ok,
    Error,
    Destroyed,
}

impl ContextState {
    #[inline]
    pub fn is_usable(self) -> bool {
        self == ContextState::Ok
    }
}

/// Stable handle of a context owned by a [`ContextManager`](super::ContextManager).
///
/// Ids are never reused within one manager.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ContextId(pub(crate) u32);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx#{}", self.0)
    }
}
