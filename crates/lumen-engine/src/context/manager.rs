use std::collections::{BTreeSet, HashMap, VecDeque};

use log::{debug, info, warn};

use crate::display::Display;
use crate::driver::{DisplayHandle, Driver};
use crate::error::{CreationStage, Error, Result};

use super::attributes::ContextAttributes;
use super::gl_ctx::GlCtx;
use super::native::Context;
use super::state::{ContextId, ContextState};

/// Owns the driver, the shared display and every live context.
///
/// The driver supports a single current context at a time. The manager keeps
/// the matching "active" marker: at most one context holds it, and every
/// [`GlCtx`] operation re-checks it before touching driver state.
///
/// Dropping the manager disposes every live context and terminates the display.
pub struct ContextManager<D: Driver> {
    driver: D,
    display: Display,
    contexts: HashMap<ContextId, Context<D>>,
    /// Live contexts, most recently created first.
    live: VecDeque<ContextId>,
    active: Option<ContextId>,
    /// Ids whose construction failed; they report `Error`.
    failed: BTreeSet<ContextId>,
    next_id: u32,
}

impl<D: Driver> ContextManager<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            display: Display::new(),
            contexts: HashMap::new(),
            live: VecDeque::new(),
            active: None,
            failed: BTreeSet::new(),
            next_id: 0,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Connects the display if needed and returns it.
    pub fn acquire_display(&mut self) -> Result<DisplayHandle> {
        self.display.acquire(&mut self.driver)
    }

    /// Terminates the display connection.
    ///
    /// Fails with [`Error::DisplayBusy`] while any context is live; a no-op when
    /// already released.
    pub fn release_display(&mut self) -> Result<()> {
        if !self.live.is_empty() {
            return Err(Error::DisplayBusy { live: self.live.len() });
        }
        self.display.release(&mut self.driver);
        Ok(())
    }

    /// Creates a `width` x `height` off-screen context and makes it active.
    ///
    /// A failed native step yields [`Error::ContextCreationFailed`]; a missing
    /// required extension disposes the fresh context and yields
    /// [`Error::UnsupportedCapability`]. Either way nothing is left registered.
    pub fn create_context(
        &mut self,
        width: u32,
        height: u32,
        attributes: ContextAttributes,
    ) -> Result<ContextId> {
        let display = self
            .display
            .acquire(&mut self.driver)
            .map_err(|_| Error::ContextCreationFailed { stage: CreationStage::Display })?;

        let id = ContextId(self.next_id);
        self.next_id += 1;

        let mut ctx = Context::new(display, width, height, attributes);
        if let Err(stage) = ctx.open(&mut self.driver) {
            ctx.discard(&mut self.driver);
            self.failed.insert(id);
            return Err(Error::ContextCreationFailed { stage });
        }

        // The new context is driver-current from here on.
        self.active = Some(id);
        self.live.push_front(id);

        if let Err(extension) = ctx.probe_capabilities(&mut self.driver) {
            warn!("{id}: required extension {extension} missing, disposing");
            self.live.retain(|&l| l != id);
            ctx.dispose(id, &mut self.driver, &mut self.active);
            self.failed.insert(id);
            return Err(Error::UnsupportedCapability { extension: extension.to_string() });
        }

        info!("{id}: created {width}x{height}");
        self.contexts.insert(id, ctx);
        Ok(id)
    }

    /// Borrows a live context for issuing commands.
    pub fn context(&mut self, id: ContextId) -> Result<GlCtx<'_, D>> {
        let ctx = self.contexts.get_mut(&id).ok_or(Error::InvalidContext)?;
        Ok(GlCtx::new(id, ctx, &mut self.driver, &mut self.active))
    }

    /// Lifecycle state of `id`.
    ///
    /// Ids whose construction failed report `Error`, disposed contexts
    /// `Destroyed`. `None` means the id was never issued by this manager.
    pub fn state(&self, id: ContextId) -> Option<ContextState> {
        match self.contexts.get(&id) {
            Some(ctx) => Some(ctx.state),
            None if self.failed.contains(&id) => Some(ContextState::Error),
            None if id.0 < self.next_id => Some(ContextState::Destroyed),
            None => None,
        }
    }

    /// The context currently bound in the driver, if any.
    #[inline]
    pub fn active(&self) -> Option<ContextId> {
        self.active
    }

    /// Live contexts, most recently created first.
    pub fn live(&self) -> impl Iterator<Item = ContextId> + '_ {
        self.live.iter().copied()
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Disposes one context.
    ///
    /// The context leaves the live list before any driver work, then its
    /// remaining objects are deleted and its native handles destroyed. Returns
    /// `false` when `id` was not live (already disposed or unknown).
    pub fn dispose(&mut self, id: ContextId) -> bool {
        self.live.retain(|&l| l != id);
        let Some(mut ctx) = self.contexts.remove(&id) else {
            return false;
        };
        ctx.dispose(id, &mut self.driver, &mut self.active);
        info!("{id}: disposed");
        true
    }

    /// Disposes every live context, newest first, then terminates the display.
    ///
    /// Safe to call repeatedly and with no live contexts.
    pub fn dispose_all(&mut self) {
        let mut disposed = 0usize;
        while let Some(&head) = self.live.front() {
            self.dispose(head);
            disposed += 1;
        }
        if disposed > 0 || self.display.is_connected() {
            info!("disposed {disposed} context(s)");
        }
        self.display.release(&mut self.driver);
        debug!("context manager idle");
    }
}

impl<D: Driver> Drop for ContextManager<D> {
    fn drop(&mut self) {
        self.dispose_all();
    }
}
