use super::gl::GlEnum;

/// Native display connection.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DisplayHandle(pub u64);

/// Native framebuffer configuration chosen for a display.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ConfigHandle(pub u64);

/// Native drawing context.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ContextHandle(pub u64);

/// Native off-screen surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SurfaceHandle(pub u64);

/// Surface kind requested from `choose_config`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceKind {
    /// Off-screen pixel buffer.
    Pbuffer,
}

/// Attribute request passed to `Driver::choose_config`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ConfigRequest {
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub alpha_bits: u8,
    pub depth_bits: u8,
    pub stencil_bits: u8,
    pub surface: SurfaceKind,
}

impl ConfigRequest {
    /// The fixed request every context is created with: RGBA8, 24-bit depth,
    /// 8-bit stencil, pbuffer surface.
    pub const fn offscreen() -> Self {
        Self {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            alpha_bits: 8,
            depth_bits: 24,
            stencil_bits: 8,
            surface: SurfaceKind::Pbuffer,
        }
    }
}

/// Client API version requested for every drawing context.
pub const CLIENT_VERSION: u32 = 2;

/// Instanced-drawing entry points, resolved once per context.
///
/// This is a flat table of plain function pointers. It is bound at context
/// creation and copied into the context; calls go straight through the
/// pointers with the shared driver as the first argument.
pub struct InstancedArrays<D> {
    pub draw_arrays_instanced: fn(&mut D, GlEnum, i32, i32, i32),
    pub draw_elements_instanced: fn(&mut D, GlEnum, i32, GlEnum, usize, i32),
    pub vertex_attrib_divisor: fn(&mut D, u32, u32),
}

impl<D> Clone for InstancedArrays<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for InstancedArrays<D> {}

impl<D> std::fmt::Debug for InstancedArrays<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstancedArrays").finish_non_exhaustive()
    }
}

/// Native graphics driver consumed by the core.
///
/// The first block mirrors the standard off-screen context API (display,
/// config, context, pbuffer surface, make-current). The rest is the subset of
/// the GLES 2 command set the core either bookkeeps or forwards. All calls are
/// synchronous. GL calls act on whatever context is current; driver-level
/// misuse is reported through `get_error`, never through return values.
pub trait Driver: Sized {
    // ── display / context / surface ───────────────────────────────────────

    fn get_display(&mut self) -> Option<DisplayHandle>;
    fn initialize(&mut self, display: DisplayHandle) -> bool;
    fn terminate(&mut self, display: DisplayHandle);

    fn choose_config(
        &mut self,
        display: DisplayHandle,
        request: &ConfigRequest,
    ) -> Option<ConfigHandle>;

    fn create_context(
        &mut self,
        display: DisplayHandle,
        config: ConfigHandle,
        client_version: u32,
    ) -> Option<ContextHandle>;

    fn create_pbuffer_surface(
        &mut self,
        display: DisplayHandle,
        config: ConfigHandle,
        width: u32,
        height: u32,
    ) -> Option<SurfaceHandle>;

    /// Binds `binding` as current, or releases the current binding for `None`.
    fn make_current(
        &mut self,
        display: DisplayHandle,
        binding: Option<(SurfaceHandle, ContextHandle)>,
    ) -> bool;

    fn destroy_context(&mut self, display: DisplayHandle, context: ContextHandle) -> bool;
    fn destroy_surface(&mut self, display: DisplayHandle, surface: SurfaceHandle) -> bool;

    /// Resolves the instanced-drawing entry points for the current context.
    fn resolve_instanced_arrays(&mut self) -> Option<InstancedArrays<Self>>;

    // ── queries ───────────────────────────────────────────────────────────

    /// Returns and clears the pending error of the current context.
    fn get_error(&mut self) -> GlEnum;
    fn get_string(&mut self, name: GlEnum) -> Option<String>;

    // ── object lifetime ───────────────────────────────────────────────────

    fn create_buffer(&mut self) -> u32;
    fn create_framebuffer(&mut self) -> u32;
    fn create_renderbuffer(&mut self) -> u32;
    fn create_texture(&mut self) -> u32;
    fn create_program(&mut self) -> u32;
    fn create_shader(&mut self, shader_type: GlEnum) -> u32;

    fn delete_buffer(&mut self, id: u32);
    fn delete_framebuffer(&mut self, id: u32);
    fn delete_renderbuffer(&mut self, id: u32);
    fn delete_texture(&mut self, id: u32);
    fn delete_program(&mut self, id: u32);
    fn delete_shader(&mut self, id: u32);

    // ── state / drawing ───────────────────────────────────────────────────

    fn pixel_store_i(&mut self, pname: GlEnum, param: i32);
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&mut self, mask: GlEnum);

    fn bind_buffer(&mut self, target: GlEnum, id: u32);
    fn bind_texture(&mut self, target: GlEnum, id: u32);
    fn bind_framebuffer(&mut self, target: GlEnum, id: u32);
    fn bind_renderbuffer(&mut self, target: GlEnum, id: u32);
    fn buffer_data(&mut self, target: GlEnum, data: &[u8], usage: GlEnum);
    fn use_program(&mut self, id: u32);
    fn draw_arrays(&mut self, mode: GlEnum, first: i32, count: i32);

    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
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
    );

    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image_2d(
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
    );

    #[allow(clippy::too_many_arguments)]
    fn read_pixels(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: GlEnum,
        ty: GlEnum,
        out: &mut [u8],
    );

    fn renderbuffer_storage(
        &mut self,
        target: GlEnum,
        internal_format: GlEnum,
        width: i32,
        height: i32,
    );

    // ── shaders / programs ────────────────────────────────────────────────

    fn shader_source(&mut self, shader: u32, source: &str);
    fn compile_shader(&mut self, shader: u32);
    fn get_shader_parameter(&mut self, shader: u32, pname: GlEnum) -> i32;
    fn get_shader_info_log(&mut self, shader: u32) -> String;
    fn attach_shader(&mut self, program: u32, shader: u32);
    fn link_program(&mut self, program: u32);
    fn get_program_parameter(&mut self, program: u32, pname: GlEnum) -> i32;
    /// Returns `-1` for a name the linked program does not use.
    fn get_uniform_location(&mut self, program: u32, name: &str) -> i32;

    // ── vertex attributes / uniforms ──────────────────────────────────────

    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        ty: GlEnum,
        normalized: bool,
        stride: i32,
        offset: usize,
    );
    fn enable_vertex_attrib_array(&mut self, index: u32);
    fn disable_vertex_attrib_array(&mut self, index: u32);

    fn uniform_1i(&mut self, location: i32, x: i32);
    fn uniform_1f(&mut self, location: i32, x: f32);
    fn uniform_4f(&mut self, location: i32, x: f32, y: f32, z: f32, w: f32);
    fn uniform_matrix_4fv(&mut self, location: i32, transpose: bool, values: &[f32]);

    fn flush(&mut self);
    fn finish(&mut self);
}
