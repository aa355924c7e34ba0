use std::borrow::Cow;

use log::debug;

use crate::driver::Driver;
use crate::driver::gl::{self, GlEnum};
use crate::error::{Error, Result};
use crate::objects::ObjectKind;
use crate::unpack::{self, PixelFormat, PixelStore, PixelType, UnpackError};

use super::attributes::ContextAttributes;
use super::native::Context;
use super::state::{ContextId, ContextState};

/// Command surface of one context.
///
/// Borrowed from [`ContextManager::context`](super::ContextManager::context).
/// Every call that reaches the driver first makes this context current and
/// fails with [`Error::InvalidContext`] when that is impossible. Driver-level
/// misuse is not an `Err`: it is queued and reported by [`get_error`](Self::get_error).
pub struct GlCtx<'a, D: Driver> {
    id: ContextId,
    ctx: &'a mut Context<D>,
    driver: &'a mut D,
    active: &'a mut Option<ContextId>,
}

impl<'a, D: Driver> GlCtx<'a, D> {
    pub(crate) fn new(
        id: ContextId,
        ctx: &'a mut Context<D>,
        driver: &'a mut D,
        active: &'a mut Option<ContextId>,
    ) -> Self {
        Self { id, ctx, driver, active }
    }

    // ── lifecycle / introspection ─────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> ContextId {
        self.id
    }

    #[inline]
    pub fn state(&self) -> ContextState {
        self.ctx.state
    }

    /// Makes this context the driver-current one.
    ///
    /// Cheap when it already is. Returns `false` (and leaves the context in
    /// `Error` if the driver refused) when the context cannot be used.
    pub fn set_active(&mut self) -> bool {
        self.ctx.activate(self.id, self.driver, self.active)
    }

    fn ensure_active(&mut self) -> Result<()> {
        if self.set_active() {
            Ok(())
        } else {
            Err(Error::InvalidContext)
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        *self.active == Some(self.id)
    }

    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        (self.ctx.width, self.ctx.height)
    }

    pub fn attributes(&self) -> ContextAttributes {
        self.ctx.attributes
    }

    /// Depth format used for `DEPTH_COMPONENT32_OES` renderbuffer requests.
    pub fn preferred_depth_format(&self) -> GlEnum {
        self.ctx.depth_format
    }

    pub fn supported_extensions(&self) -> &[String] {
        &self.ctx.extensions
    }

    pub fn pixel_store(&self) -> PixelStore {
        self.ctx.pixel_store
    }

    /// Number of objects this context will delete if disposed now.
    pub fn owned_objects(&self) -> usize {
        self.ctx.objects.len()
    }

    // ── errors ────────────────────────────────────────────────────────────

    /// Returns the shadowed error if one is parked, else the driver's.
    pub fn get_error(&mut self) -> Result<GlEnum> {
        self.ensure_active()?;
        let driver = &mut *self.driver;
        Ok(self.ctx.shadow.take(|| driver.get_error()))
    }

    /// Parks an error raised by a validation layer above this context.
    pub fn set_error(&mut self, code: GlEnum) -> Result<()> {
        self.ensure_active()?;
        self.record(code);
        Ok(())
    }

    fn record(&mut self, code: GlEnum) {
        let driver = &mut *self.driver;
        self.ctx.shadow.record(code, || driver.get_error());
    }

    // ── pixel store ───────────────────────────────────────────────────────

    /// Sets a pixel-store parameter.
    ///
    /// The WebGL unpack keys only update this context's unpack state.
    /// `UNPACK_ALIGNMENT` is kept here and forwarded. Anything else goes
    /// straight to the driver.
    pub fn pixel_store_i(&mut self, pname: GlEnum, param: i32) -> Result<()> {
        self.ensure_active()?;
        let store = &mut self.ctx.pixel_store;
        match pname {
            gl::UNPACK_FLIP_Y_WEBGL => store.flip_y = param != 0,
            gl::UNPACK_PREMULTIPLY_ALPHA_WEBGL => store.premultiply_alpha = param != 0,
            gl::UNPACK_COLORSPACE_CONVERSION_WEBGL => store.colorspace_conversion = param as GlEnum,
            gl::UNPACK_ALIGNMENT => {
                let valid = u32::try_from(param)
                    .is_ok_and(|align| PixelStore::ALIGNMENTS.contains(&align));
                if valid {
                    store.unpack_alignment = param as u32;
                    self.driver.pixel_store_i(pname, param);
                } else {
                    self.record(gl::INVALID_VALUE);
                }
            }
            _ => self.driver.pixel_store_i(pname, param),
        }
        Ok(())
    }

    // ── objects ───────────────────────────────────────────────────────────

    fn create(&mut self, kind: ObjectKind, create: impl FnOnce(&mut D) -> u32) -> Result<u32> {
        self.ensure_active()?;
        let id = create(&mut *self.driver);
        if id != 0 {
            self.ctx.objects.register(kind, id);
        }
        Ok(id)
    }

    fn delete(&mut self, kind: ObjectKind, id: u32, delete: impl FnOnce(&mut D, u32)) -> Result<()> {
        self.ensure_active()?;
        self.ctx.objects.unregister(kind, id);
        delete(&mut *self.driver, id);
        Ok(())
    }

    pub fn create_buffer(&mut self) -> Result<u32> {
        self.create(ObjectKind::Buffer, D::create_buffer)
    }

    pub fn create_framebuffer(&mut self) -> Result<u32> {
        self.create(ObjectKind::Framebuffer, D::create_framebuffer)
    }

    pub fn create_renderbuffer(&mut self) -> Result<u32> {
        self.create(ObjectKind::Renderbuffer, D::create_renderbuffer)
    }

    pub fn create_texture(&mut self) -> Result<u32> {
        self.create(ObjectKind::Texture, D::create_texture)
    }

    pub fn create_program(&mut self) -> Result<u32> {
        self.create(ObjectKind::Program, D::create_program)
    }

    pub fn create_shader(&mut self, shader_type: GlEnum) -> Result<u32> {
        self.create(ObjectKind::Shader, |d| d.create_shader(shader_type))
    }

    pub fn delete_buffer(&mut self, id: u32) -> Result<()> {
        self.delete(ObjectKind::Buffer, id, D::delete_buffer)
    }

    pub fn delete_framebuffer(&mut self, id: u32) -> Result<()> {
        self.delete(ObjectKind::Framebuffer, id, D::delete_framebuffer)
    }

    pub fn delete_renderbuffer(&mut self, id: u32) -> Result<()> {
        self.delete(ObjectKind::Renderbuffer, id, D::delete_renderbuffer)
    }

    pub fn delete_texture(&mut self, id: u32) -> Result<()> {
        self.delete(ObjectKind::Texture, id, D::delete_texture)
    }

    pub fn delete_program(&mut self, id: u32) -> Result<()> {
        self.delete(ObjectKind::Program, id, D::delete_program)
    }

    pub fn delete_shader(&mut self, id: u32) -> Result<()> {
        self.delete(ObjectKind::Shader, id, D::delete_shader)
    }

    // ── uploads ───────────────────────────────────────────────────────────

    /// Applies the unpack state to client pixels.
    ///
    /// Borrows `src` when no transform is needed. On failure the error is
    /// parked and `None` returned; the upload must then be skipped.
    fn unpack_source<'p>(
        &mut self,
        width: i32,
        height: i32,
        format: GlEnum,
        ty: GlEnum,
        src: &'p [u8],
    ) -> Option<Cow<'p, [u8]>> {
        let store = self.ctx.pixel_store;
        if store.is_passthrough() {
            return Some(Cow::Borrowed(src));
        }

        let (Some(ty), Some(format)) = (PixelType::from_gl(ty), PixelFormat::from_gl(format)) else {
            self.record(gl::INVALID_ENUM);
            return None;
        };
        let (Ok(width), Ok(height)) = (usize::try_from(width), usize::try_from(height)) else {
            self.record(gl::INVALID_VALUE);
            return None;
        };

        match unpack::prepare(&store, ty, format, width, height, src) {
            Ok(data) => Some(data),
            Err(err) => {
                debug!("{}: {err}", self.id);
                self.record(match err {
                    UnpackError::TooLarge { .. } => gl::INVALID_VALUE,
                    UnpackError::SourceTooShort { .. } => gl::INVALID_OPERATION,
                });
                None
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn tex_image_2d(
        &mut self,
        target: GlEnum,
        level: i32,
        internal_format: GlEnum,
        width: i32,
        height: i32,
        border: i32,
        format: GlEnum,
        ty: GlEnum,
        pixels: Option<&[u8]>,
    ) -> Result<()> {
        self.ensure_active()?;
        let data = match pixels {
            Some(src) => match self.unpack_source(width, height, format, ty, src) {
                Some(data) => Some(data),
                None => return Ok(()),
            },
            None => None,
        };
        self.driver.tex_image_2d(
            target,
            level,
            internal_format,
            width,
            height,
            border,
            format,
            ty,
            data.as_deref(),
        );
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn tex_sub_image_2d(
        &mut self,
        target: GlEnum,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        width: i32,
        height: i32,
        format: GlEnum,
        ty: GlEnum,
        pixels: &[u8],
    ) -> Result<()> {
        self.ensure_active()?;
        let Some(data) = self.unpack_source(width, height, format, ty, pixels) else {
            return Ok(());
        };
        self.driver
            .tex_sub_image_2d(target, level, x_offset, y_offset, width, height, format, ty, &data);
        Ok(())
    }

    // ── renderbuffers ─────────────────────────────────────────────────────

    /// Allocates renderbuffer storage.
    ///
    /// `DEPTH_COMPONENT32_OES` resolves to the best depth format the driver
    /// advertised; WebGL's `DEPTH_STENCIL` becomes `DEPTH24_STENCIL8`. Other
    /// formats, `DEPTH_COMPONENT16` included, pass through.
    pub fn renderbuffer_storage(
        &mut self,
        target: GlEnum,
        internal_format: GlEnum,
        width: i32,
        height: i32,
    ) -> Result<()> {
        self.ensure_active()?;
        let internal_format = match internal_format {
            gl::DEPTH_COMPONENT32_OES => self.ctx.depth_format,
            gl::DEPTH_STENCIL_OES => gl::DEPTH24_STENCIL8_OES,
            other => other,
        };
        self.driver.renderbuffer_storage(target, internal_format, width, height);
        Ok(())
    }

    // ── instanced drawing ─────────────────────────────────────────────────

    pub fn draw_arrays_instanced(
        &mut self,
        mode: GlEnum,
        first: i32,
        count: i32,
        primcount: i32,
    ) -> Result<()> {
        self.ensure_active()?;
        let table = self.ctx.instanced.ok_or(Error::InvalidContext)?;
        (table.draw_arrays_instanced)(&mut *self.driver, mode, first, count, primcount);
        Ok(())
    }

    pub fn draw_elements_instanced(
        &mut self,
        mode: GlEnum,
        count: i32,
        ty: GlEnum,
        offset: usize,
        primcount: i32,
    ) -> Result<()> {
        self.ensure_active()?;
        let table = self.ctx.instanced.ok_or(Error::InvalidContext)?;
        (table.draw_elements_instanced)(&mut *self.driver, mode, count, ty, offset, primcount);
        Ok(())
    }

    pub fn vertex_attrib_divisor(&mut self, index: u32, divisor: u32) -> Result<()> {
        self.ensure_active()?;
        let table = self.ctx.instanced.ok_or(Error::InvalidContext)?;
        (table.vertex_attrib_divisor)(&mut *self.driver, index, divisor);
        Ok(())
    }

    // ── shaders / programs ────────────────────────────────────────────────

    pub fn shader_source(&mut self, shader: u32, source: &str) -> Result<()> {
        self.ensure_active()?;
        self.driver.shader_source(shader, source);
        Ok(())
    }

    pub fn compile_shader(&mut self, shader: u32) -> Result<()> {
        self.ensure_active()?;
        self.driver.compile_shader(shader);
        Ok(())
    }

    pub fn get_shader_parameter(&mut self, shader: u32, pname: GlEnum) -> Result<i32> {
        self.ensure_active()?;
        Ok(self.driver.get_shader_parameter(shader, pname))
    }

    pub fn get_shader_info_log(&mut self, shader: u32) -> Result<String> {
        self.ensure_active()?;
        Ok(self.driver.get_shader_info_log(shader))
    }

    pub fn attach_shader(&mut self, program: u32, shader: u32) -> Result<()> {
        self.ensure_active()?;
        self.driver.attach_shader(program, shader);
        Ok(())
    }

    pub fn link_program(&mut self, program: u32) -> Result<()> {
        self.ensure_active()?;
        self.driver.link_program(program);
        Ok(())
    }

    pub fn get_program_parameter(&mut self, program: u32, pname: GlEnum) -> Result<i32> {
        self.ensure_active()?;
        Ok(self.driver.get_program_parameter(program, pname))
    }

    /// `-1` when the linked program has no uniform called `name`.
    pub fn get_uniform_location(&mut self, program: u32, name: &str) -> Result<i32> {
        self.ensure_active()?;
        Ok(self.driver.get_uniform_location(program, name))
    }

    // ── vertex attributes / uniforms ──────────────────────────────────────

    pub fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        ty: GlEnum,
        normalized: bool,
        stride: i32,
        offset: usize,
    ) -> Result<()> {
        self.ensure_active()?;
        self.driver.vertex_attrib_pointer(index, size, ty, normalized, stride, offset);
        Ok(())
    }

    pub fn enable_vertex_attrib_array(&mut self, index: u32) -> Result<()> {
        self.ensure_active()?;
        self.driver.enable_vertex_attrib_array(index);
        Ok(())
    }

    pub fn disable_vertex_attrib_array(&mut self, index: u32) -> Result<()> {
        self.ensure_active()?;
        self.driver.disable_vertex_attrib_array(index);
        Ok(())
    }

    pub fn uniform_1i(&mut self, location: i32, x: i32) -> Result<()> {
        self.ensure_active()?;
        self.driver.uniform_1i(location, x);
        Ok(())
    }

    pub fn uniform_1f(&mut self, location: i32, x: f32) -> Result<()> {
        self.ensure_active()?;
        self.driver.uniform_1f(location, x);
        Ok(())
    }

    pub fn uniform_4f(&mut self, location: i32, x: f32, y: f32, z: f32, w: f32) -> Result<()> {
        self.ensure_active()?;
        self.driver.uniform_4f(location, x, y, z, w);
        Ok(())
    }

    pub fn uniform_matrix_4fv(&mut self, location: i32, transpose: bool, values: &[f32]) -> Result<()> {
        self.ensure_active()?;
        self.driver.uniform_matrix_4fv(location, transpose, values);
        Ok(())
    }

    // ── passthroughs ──────────────────────────────────────────────────────

    pub fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        self.ensure_active()?;
        self.driver.viewport(x, y, width, height);
        Ok(())
    }

    pub fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) -> Result<()> {
        self.ensure_active()?;
        self.driver.clear_color(r, g, b, a);
        Ok(())
    }

    pub fn clear(&mut self, mask: GlEnum) -> Result<()> {
        self.ensure_active()?;
        self.driver.clear(mask);
        Ok(())
    }

    pub fn bind_buffer(&mut self, target: GlEnum, id: u32) -> Result<()> {
        self.ensure_active()?;
        self.driver.bind_buffer(target, id);
        Ok(())
    }

    pub fn bind_texture(&mut self, target: GlEnum, id: u32) -> Result<()> {
        self.ensure_active()?;
        self.driver.bind_texture(target, id);
        Ok(())
    }

    pub fn bind_framebuffer(&mut self, target: GlEnum, id: u32) -> Result<()> {
        self.ensure_active()?;
        self.driver.bind_framebuffer(target, id);
        Ok(())
    }

    pub fn bind_renderbuffer(&mut self, target: GlEnum, id: u32) -> Result<()> {
        self.ensure_active()?;
        self.driver.bind_renderbuffer(target, id);
        Ok(())
    }

    pub fn buffer_data(&mut self, target: GlEnum, data: &[u8], usage: GlEnum) -> Result<()> {
        self.ensure_active()?;
        self.driver.buffer_data(target, data, usage);
        Ok(())
    }

    pub fn use_program(&mut self, id: u32) -> Result<()> {
        self.ensure_active()?;
        self.driver.use_program(id);
        Ok(())
    }

    pub fn draw_arrays(&mut self, mode: GlEnum, first: i32, count: i32) -> Result<()> {
        self.ensure_active()?;
        self.driver.draw_arrays(mode, first, count);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn read_pixels(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: GlEnum,
        ty: GlEnum,
        out: &mut [u8],
    ) -> Result<()> {
        self.ensure_active()?;
        self.driver.read_pixels(x, y, width, height, format, ty, out);
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.ensure_active()?;
        self.driver.flush();
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        self.ensure_active()?;
        self.driver.finish();
        Ok(())
    }
}
