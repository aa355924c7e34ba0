use log::{debug, warn};

use crate::driver::gl::{self, GlEnum};
use crate::driver::{
    CLIENT_VERSION, ConfigRequest, ContextHandle, DisplayHandle, Driver, InstancedArrays,
    SurfaceHandle,
};
use crate::error::{CreationStage, ErrorShadow};
use crate::objects::{GpuObject, ObjectKind, ObjectRegistry};
use crate::unpack::PixelStore;

use super::attributes::ContextAttributes;
use super::state::{ContextId, ContextState};

/// One off-screen rendering target: a pbuffer surface plus a drawing context,
/// with the bookkeeping layered on top of them.
pub(crate) struct Context<D> {
    pub(crate) state: ContextState,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) attributes: ContextAttributes,

    display: DisplayHandle,
    surface: Option<SurfaceHandle>,
    handle: Option<ContextHandle>,

    pub(crate) pixel_store: PixelStore,
    pub(crate) shadow: ErrorShadow,
    pub(crate) objects: ObjectRegistry,

    /// Renderbuffer format substituted for `DEPTH_COMPONENT32_OES` requests.
    pub(crate) depth_format: GlEnum,
    pub(crate) instanced: Option<InstancedArrays<D>>,
    pub(crate) extensions: Vec<String>,
}

impl<D: Driver> Context<D> {
    pub(crate) fn new(
        display: DisplayHandle,
        width: u32,
        height: u32,
        attributes: ContextAttributes,
    ) -> Self {
        Self {
            state: ContextState::Init,
            width,
            height,
            attributes,
            display,
            surface: None,
            handle: None,
            pixel_store: PixelStore::default(),
            shadow: ErrorShadow::new(),
            objects: ObjectRegistry::new(),
            depth_format: gl::DEPTH_COMPONENT16,
            instanced: None,
            extensions: Vec::new(),
        }
    }

    /// Runs the native construction steps in order.
    ///
    /// On success the new context is driver-current and in `Ok`. Any failing
    /// step leaves it in `Error` with whatever handles were already created.
    pub(crate) fn open(&mut self, driver: &mut D) -> Result<(), CreationStage> {
        let result = self.open_native(driver);
        self.state = match result {
            Ok(()) => ContextState::Ok,
            Err(stage) => {
                warn!("context creation failed at {stage} ({}x{})", self.width, self.height);
                ContextState::Error
            }
        };
        result
    }

    fn open_native(&mut self, driver: &mut D) -> Result<(), CreationStage> {
        let config = driver
            .choose_config(self.display, &ConfigRequest::offscreen())
            .ok_or(CreationStage::Config)?;

        let handle = driver
            .create_context(self.display, config, CLIENT_VERSION)
            .ok_or(CreationStage::Context)?;
        self.handle = Some(handle);

        let surface = driver
            .create_pbuffer_surface(self.display, config, self.width, self.height)
            .ok_or(CreationStage::Surface)?;
        self.surface = Some(surface);

        if !driver.make_current(self.display, Some((surface, handle))) {
            return Err(CreationStage::MakeCurrent);
        }
        Ok(())
    }

    /// Resolves entry points and checks extensions on a freshly opened,
    /// current context.
    ///
    /// Returns the name of the first missing required capability.
    pub(crate) fn probe_capabilities(&mut self, driver: &mut D) -> Result<(), &'static str> {
        self.instanced = driver.resolve_instanced_arrays();

        let extensions = driver.get_string(gl::EXTENSIONS).unwrap_or_default();
        self.extensions = extensions.split_whitespace().map(str::to_owned).collect();

        for required in [gl::EXT_PACKED_DEPTH_STENCIL, gl::EXT_INSTANCED_ARRAYS] {
            if !self.has_extension(required) {
                return Err(required);
            }
        }
        if self.instanced.is_none() {
            return Err(gl::EXT_INSTANCED_ARRAYS);
        }

        self.depth_format = if self.has_extension(gl::EXT_DEPTH32) {
            gl::DEPTH_COMPONENT32_OES
        } else if self.has_extension(gl::EXT_DEPTH24) {
            gl::DEPTH_COMPONENT24_OES
        } else {
            gl::DEPTH_COMPONENT16
        };
        debug!("preferred depth format {:#06x}", self.depth_format);
        Ok(())
    }

    pub(crate) fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| e == name)
    }

    /// Releases whatever a failed [`open`](Self::open) managed to create.
    ///
    /// Nothing of this context is current at that point, so the current
    /// binding is left alone. The state stays `Error`.
    pub(crate) fn discard(&mut self, driver: &mut D) {
        if let Some(handle) = self.handle.take() {
            driver.destroy_context(self.display, handle);
        }
        if let Some(surface) = self.surface.take() {
            driver.destroy_surface(self.display, surface);
        }
    }

    /// Makes this context driver-current.
    ///
    /// No driver call is made when `id` already holds the active marker. A
    /// failing make-current moves the context to `Error`.
    pub(crate) fn activate(
        &mut self,
        id: ContextId,
        driver: &mut D,
        active: &mut Option<ContextId>,
    ) -> bool {
        if !self.state.is_usable() {
            return false;
        }
        if *active == Some(id) {
            return true;
        }

        let (Some(surface), Some(handle)) = (self.surface, self.handle) else {
            self.state = ContextState::Error;
            return false;
        };
        if !driver.make_current(self.display, Some((surface, handle))) {
            warn!("{id}: make current failed");
            self.state = ContextState::Error;
            return false;
        }

        *active = Some(id);
        true
    }

    /// Deletes every remaining object, releases the current binding and
    /// destroys the native context and surface.
    ///
    /// The caller unregisters the context from the live list first. Calling
    /// this on a `Destroyed` context does nothing.
    pub(crate) fn dispose(&mut self, id: ContextId, driver: &mut D, active: &mut Option<ContextId>) {
        if self.state == ContextState::Destroyed {
            return;
        }

        let objects = self.objects.drain();
        if self.activate(id, driver, active) {
            for object in &objects {
                delete_object(driver, *object);
            }
            debug!("{id}: swept {} object(s)", objects.len());
        } else if !objects.is_empty() {
            warn!("{id}: not current, {} object(s) left to the driver", objects.len());
        }

        driver.make_current(self.display, None);
        *active = None;

        if let Some(handle) = self.handle.take() {
            driver.destroy_context(self.display, handle);
        }
        if let Some(surface) = self.surface.take() {
            driver.destroy_surface(self.display, surface);
        }

        self.instanced = None;
        self.state = ContextState::Destroyed;
        debug!("{id}: destroyed");
    }
}

fn delete_object<D: Driver>(driver: &mut D, object: GpuObject) {
    match object.kind {
        ObjectKind::Program => driver.delete_program(object.id),
        ObjectKind::Buffer => driver.delete_buffer(object.id),
        ObjectKind::Framebuffer => driver.delete_framebuffer(object.id),
        ObjectKind::Renderbuffer => driver.delete_renderbuffer(object.id),
        ObjectKind::Shader => driver.delete_shader(object.id),
        ObjectKind::Texture => driver.delete_texture(object.id),
    }
}
