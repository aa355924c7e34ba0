use std::collections::{HashMap, HashSet};

use crate::objects::ObjectKind;

use super::api::{
    ConfigHandle, ConfigRequest, ContextHandle, DisplayHandle, Driver, InstancedArrays,
    SurfaceHandle, SurfaceKind, CLIENT_VERSION,
};
use super::gl::{self, GlEnum};

/// Behaviour switches for [`SoftwareDriver`].
///
/// Every `*_ok` / `*_available` flag defaults to `true`. Flipping one makes the
/// matching driver call fail, which is how creation-failure paths are exercised.
#[derive(Debug, Clone)]
pub struct SoftwareOptions {
    pub display_available: bool,
    pub initialize_ok: bool,
    pub config_available: bool,
    pub context_creation_ok: bool,
    pub surface_creation_ok: bool,
    pub make_current_ok: bool,
    /// Extension names advertised through `get_string(EXTENSIONS)`.
    pub extensions: Vec<String>,
    /// Largest accepted pbuffer dimension.
    pub max_surface_size: u32,
}

impl Default for SoftwareOptions {
    fn default() -> Self {
        Self {
            display_available: true,
            initialize_ok: true,
            config_available: true,
            context_creation_ok: true,
            surface_creation_ok: true,
            make_current_ok: true,
            extensions: vec![
                gl::EXT_PACKED_DEPTH_STENCIL.to_string(),
                gl::EXT_INSTANCED_ARRAYS.to_string(),
                gl::EXT_DEPTH24.to_string(),
            ],
            max_surface_size: 4096,
        }
    }
}

impl SoftwareOptions {
    /// Replaces the advertised extension list.
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| e == name)
    }
}

/// A texture upload as the driver received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub texture: u32,
    pub level: i32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub width: i32,
    pub height: i32,
    pub format: GlEnum,
    pub ty: GlEnum,
    pub data: Option<Vec<u8>>,
}

/// A vertex attribute array as `vertex_attrib_pointer` recorded it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttribPointer {
    pub size: i32,
    pub ty: GlEnum,
    pub normalized: bool,
    pub stride: i32,
    pub offset: usize,
    /// Array buffer bound when the pointer was set.
    pub buffer: u32,
}

const MAX_VERTEX_ATTRIBS: u32 = 16;

#[derive(Debug, Default)]
struct Shader {
    ty: GlEnum,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct Program {
    shaders: Vec<u32>,
    linked: bool,
    /// Active uniform names; a location is an index into this list.
    uniforms: Vec<String>,
    values: HashMap<i32, Vec<f32>>,
}

/// Uniform names declared by `uniform <type> <name>;` statements.
fn declared_uniforms(source: &str) -> impl Iterator<Item = &str> {
    source.split(';').filter_map(|stmt| {
        let mut words = stmt.split_whitespace();
        if words.next()? != "uniform" {
            return None;
        }
        let name = words.last()?;
        Some(name.split_once('[').map_or(name, |(base, _)| base))
    })
}

/// Per-context GL state.
#[derive(Debug)]
struct GlState {
    error: GlEnum,
    next_name: u32,
    objects: HashMap<u32, ObjectKind>,
    clear_color: [f32; 4],
    unpack_alignment: i32,
    pack_alignment: i32,
    viewport: [i32; 4],
    array_buffer: u32,
    element_buffer: u32,
    texture: u32,
    framebuffer: u32,
    renderbuffer: u32,
    program: u32,
    renderbuffer_formats: HashMap<u32, GlEnum>,
    buffer_sizes: HashMap<u32, usize>,
    divisors: HashMap<u32, u32>,
    shaders: HashMap<u32, Shader>,
    programs: HashMap<u32, Program>,
    attribs: HashMap<u32, AttribPointer>,
    enabled_attribs: HashSet<u32>,
}

impl GlState {
    fn new() -> Self {
        Self {
            error: gl::NO_ERROR,
            next_name: 0,
            objects: HashMap::new(),
            clear_color: [0.0; 4],
            unpack_alignment: 4,
            pack_alignment: 4,
            viewport: [0; 4],
            array_buffer: 0,
            element_buffer: 0,
            texture: 0,
            framebuffer: 0,
            renderbuffer: 0,
            program: 0,
            renderbuffer_formats: HashMap::new(),
            buffer_sizes: HashMap::new(),
            divisors: HashMap::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            attribs: HashMap::new(),
            enabled_attribs: HashSet::new(),
        }
    }

    /// GL keeps the first error until it is queried.
    fn raise(&mut self, code: GlEnum) {
        if self.error == gl::NO_ERROR {
            self.error = code;
        }
    }

    fn allocate(&mut self, kind: ObjectKind) -> u32 {
        self.next_name += 1;
        self.objects.insert(self.next_name, kind);
        self.next_name
    }

    fn is(&self, kind: ObjectKind, id: u32) -> bool {
        self.objects.get(&id) == Some(&kind)
    }

    /// Validates a shader or program name argument: another kind of object is
    /// `INVALID_OPERATION`, an unknown name `INVALID_VALUE`.
    fn check_name(&mut self, kind: ObjectKind, id: u32) -> bool {
        match self.objects.get(&id) {
            Some(&found) if found == kind => true,
            Some(_) => {
                self.raise(gl::INVALID_OPERATION);
                false
            }
            None => {
                self.raise(gl::INVALID_VALUE);
                false
            }
        }
    }

    fn check_attrib(&mut self, index: u32) -> bool {
        if index < MAX_VERTEX_ATTRIBS {
            true
        } else {
            self.raise(gl::INVALID_VALUE);
            false
        }
    }

    /// Stores `values` at `location` of the program in use. `-1` is ignored.
    fn set_uniform(&mut self, location: i32, values: Vec<f32>) {
        if location == -1 {
            return;
        }
        let Some(program) = self.programs.get_mut(&self.program) else {
            self.raise(gl::INVALID_OPERATION);
            return;
        };
        if location < 0 || location as usize >= program.uniforms.len() {
            self.raise(gl::INVALID_OPERATION);
        } else {
            program.values.insert(location, values);
        }
    }

    /// Validates a bind of `id` as `kind`; 0 always unbinds.
    fn check_bind(&mut self, kind: ObjectKind, id: u32) -> bool {
        if id == 0 || self.is(kind, id) {
            true
        } else {
            self.raise(gl::INVALID_OPERATION);
            false
        }
    }
}

#[derive(Debug)]
struct Surface {
    width: u32,
    height: u32,
    /// RGBA8, row 0 is the bottom row.
    color: Vec<u8>,
}

const DISPLAY: DisplayHandle = DisplayHandle(1);
const CONFIG: ConfigHandle = ConfigHandle(1);

/// In-memory implementation of [`Driver`].
///
/// Surfaces are RGBA8 color buffers; drawing commands other than `clear` are
/// validated and counted but do not rasterize. Every GL call operates on the
/// current context and is silently dropped when nothing is current.
#[derive(Debug)]
pub struct SoftwareDriver {
    options: SoftwareOptions,
    initialized: bool,
    next_handle: u64,
    contexts: HashMap<ContextHandle, GlState>,
    surfaces: HashMap<SurfaceHandle, Surface>,
    current: Option<(SurfaceHandle, ContextHandle)>,

    make_current_calls: usize,
    draw_calls: usize,
    instanced_draws: usize,
    deleted_objects: usize,
    leaked_objects: usize,
    last_upload: Option<Upload>,
}

impl SoftwareDriver {
    pub fn new(options: SoftwareOptions) -> Self {
        Self {
            options,
            initialized: false,
            next_handle: 0,
            contexts: HashMap::new(),
            surfaces: HashMap::new(),
            current: None,
            make_current_calls: 0,
            draw_calls: 0,
            instanced_draws: 0,
            deleted_objects: 0,
            leaked_objects: 0,
            last_upload: None,
        }
    }

    pub fn options(&self) -> &SoftwareOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut SoftwareOptions {
        &mut self.options
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn live_contexts(&self) -> usize {
        self.contexts.len()
    }

    pub fn live_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    pub fn current(&self) -> Option<(SurfaceHandle, ContextHandle)> {
        self.current
    }

    pub fn make_current_calls(&self) -> usize {
        self.make_current_calls
    }

    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    pub fn instanced_draws(&self) -> usize {
        self.instanced_draws
    }

    /// Objects deleted through the `delete_*` calls.
    pub fn deleted_objects(&self) -> usize {
        self.deleted_objects
    }

    /// Objects still alive when their owning context was destroyed.
    pub fn leaked_objects(&self) -> usize {
        self.leaked_objects
    }

    /// Objects alive across every context.
    pub fn live_objects(&self) -> usize {
        self.contexts.values().map(|s| s.objects.len()).sum()
    }

    pub fn last_upload(&self) -> Option<&Upload> {
        self.last_upload.as_ref()
    }

    /// Storage format of a renderbuffer in the current context.
    pub fn renderbuffer_format(&self, id: u32) -> Option<GlEnum> {
        let (_, ctx) = self.current?;
        self.contexts.get(&ctx)?.renderbuffer_formats.get(&id).copied()
    }

    /// Unpack alignment the current context was last given.
    pub fn unpack_alignment(&self) -> Option<i32> {
        let (_, ctx) = self.current?;
        Some(self.contexts.get(&ctx)?.unpack_alignment)
    }

    pub fn viewport_rect(&self) -> Option<[i32; 4]> {
        let (_, ctx) = self.current?;
        Some(self.contexts.get(&ctx)?.viewport)
    }

    /// Byte size of a buffer's data store in the current context.
    pub fn buffer_size(&self, id: u32) -> Option<usize> {
        let (_, ctx) = self.current?;
        self.contexts.get(&ctx)?.buffer_sizes.get(&id).copied()
    }

    /// Vertex attribute divisor in the current context.
    pub fn attrib_divisor(&self, index: u32) -> Option<u32> {
        let (_, ctx) = self.current?;
        self.contexts.get(&ctx)?.divisors.get(&index).copied()
    }

    /// Whether the last `link_program` of `id` succeeded in the current context.
    pub fn program_linked(&self, id: u32) -> bool {
        self.current
            .and_then(|(_, ctx)| self.contexts.get(&ctx)?.programs.get(&id))
            .is_some_and(|p| p.linked)
    }

    /// Value last stored at `location` of `program` in the current context.
    pub fn uniform_value(&self, program: u32, location: i32) -> Option<&[f32]> {
        let (_, ctx) = self.current?;
        let program = self.contexts.get(&ctx)?.programs.get(&program)?;
        program.values.get(&location).map(Vec::as_slice)
    }

    pub fn attrib_pointer(&self, index: u32) -> Option<AttribPointer> {
        let (_, ctx) = self.current?;
        self.contexts.get(&ctx)?.attribs.get(&index).copied()
    }

    pub fn attrib_enabled(&self, index: u32) -> bool {
        self.current
            .and_then(|(_, ctx)| self.contexts.get(&ctx))
            .is_some_and(|s| s.enabled_attribs.contains(&index))
    }

    /// Raises `code` on the current context as if a GL call had failed.
    pub fn inject_error(&mut self, code: GlEnum) {
        if let Some(state) = self.state() {
            state.raise(code);
        }
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn state(&mut self) -> Option<&mut GlState> {
        let (_, ctx) = self.current?;
        self.contexts.get_mut(&ctx)
    }

    fn surface(&mut self) -> Option<&mut Surface> {
        let (surface, _) = self.current?;
        self.surfaces.get_mut(&surface)
    }

    fn create(&mut self, kind: ObjectKind) -> u32 {
        self.state().map(|s| s.allocate(kind)).unwrap_or(0)
    }

    fn delete(&mut self, kind: ObjectKind, id: u32) {
        let Some(state) = self.state() else { return };
        if id == 0 {
            return;
        }

        match state.objects.get(&id).copied() {
            Some(found) if found == kind => {
                state.objects.remove(&id);
                state.renderbuffer_formats.remove(&id);
                state.buffer_sizes.remove(&id);
                state.shaders.remove(&id);
                state.programs.remove(&id);
                for program in state.programs.values_mut() {
                    program.shaders.retain(|&s| s != id);
                }
                for bound in [
                    &mut state.array_buffer,
                    &mut state.element_buffer,
                    &mut state.texture,
                    &mut state.framebuffer,
                    &mut state.renderbuffer,
                    &mut state.program,
                ] {
                    if *bound == id {
                        *bound = 0;
                    }
                }
                self.deleted_objects += 1;
            }
            // Programs and shaders validate their names; the rest ignore unknown ids.
            Some(_) if matches!(kind, ObjectKind::Program | ObjectKind::Shader) => {
                state.raise(gl::INVALID_OPERATION);
            }
            None if matches!(kind, ObjectKind::Program | ObjectKind::Shader) => {
                state.raise(gl::INVALID_VALUE);
            }
            _ => {}
        }
    }

    fn draw_arrays_instanced_angle(&mut self, mode: GlEnum, first: i32, count: i32, primcount: i32) {
        let Some(state) = self.state() else { return };
        if mode > gl::TRIANGLES + 2 {
            state.raise(gl::INVALID_ENUM);
        } else if first < 0 || count < 0 || primcount < 0 {
            state.raise(gl::INVALID_VALUE);
        } else {
            self.instanced_draws += 1;
        }
    }

    fn draw_elements_instanced_angle(
        &mut self,
        mode: GlEnum,
        count: i32,
        ty: GlEnum,
        _offset: usize,
        primcount: i32,
    ) {
        let Some(state) = self.state() else { return };
        if mode > gl::TRIANGLES + 2 || (ty != gl::UNSIGNED_BYTE && ty != gl::UNSIGNED_SHORT) {
            state.raise(gl::INVALID_ENUM);
        } else if count < 0 || primcount < 0 {
            state.raise(gl::INVALID_VALUE);
        } else if state.element_buffer == 0 {
            state.raise(gl::INVALID_OPERATION);
        } else {
            self.instanced_draws += 1;
        }
    }

    fn vertex_attrib_divisor_angle(&mut self, index: u32, divisor: u32) {
        let Some(state) = self.state() else { return };
        if index >= 16 {
            state.raise(gl::INVALID_VALUE);
        } else {
            state.divisors.insert(index, divisor);
        }
    }
}

impl Default for SoftwareDriver {
    fn default() -> Self {
        Self::new(SoftwareOptions::default())
    }
}

impl Driver for SoftwareDriver {
    fn get_display(&mut self) -> Option<DisplayHandle> {
        self.options.display_available.then_some(DISPLAY)
    }

    fn initialize(&mut self, display: DisplayHandle) -> bool {
        if display != DISPLAY || !self.options.initialize_ok {
            return false;
        }
        self.initialized = true;
        true
    }

    fn terminate(&mut self, display: DisplayHandle) {
        if display == DISPLAY {
            self.initialized = false;
            self.current = None;
        }
    }

    fn choose_config(
        &mut self,
        display: DisplayHandle,
        request: &ConfigRequest,
    ) -> Option<ConfigHandle> {
        let supported = request.red_bits <= 8
            && request.green_bits <= 8
            && request.blue_bits <= 8
            && request.alpha_bits <= 8
            && request.depth_bits <= 24
            && request.stencil_bits <= 8
            && request.surface == SurfaceKind::Pbuffer;

        (display == DISPLAY && self.initialized && self.options.config_available && supported)
            .then_some(CONFIG)
    }

    fn create_context(
        &mut self,
        display: DisplayHandle,
        config: ConfigHandle,
        client_version: u32,
    ) -> Option<ContextHandle> {
        if display != DISPLAY
            || config != CONFIG
            || !self.initialized
            || !self.options.context_creation_ok
            || client_version != CLIENT_VERSION
        {
            return None;
        }
        let handle = ContextHandle(self.next_handle());
        self.contexts.insert(handle, GlState::new());
        Some(handle)
    }

    fn create_pbuffer_surface(
        &mut self,
        display: DisplayHandle,
        config: ConfigHandle,
        width: u32,
        height: u32,
    ) -> Option<SurfaceHandle> {
        let max = self.options.max_surface_size;
        if display != DISPLAY
            || config != CONFIG
            || !self.initialized
            || !self.options.surface_creation_ok
            || width == 0
            || height == 0
            || width > max
            || height > max
        {
            return None;
        }
        let handle = SurfaceHandle(self.next_handle());
        self.surfaces.insert(
            handle,
            Surface {
                width,
                height,
                color: vec![0; width as usize * height as usize * 4],
            },
        );
        Some(handle)
    }

    fn make_current(
        &mut self,
        display: DisplayHandle,
        binding: Option<(SurfaceHandle, ContextHandle)>,
    ) -> bool {
        self.make_current_calls += 1;
        if display != DISPLAY || !self.initialized {
            return false;
        }
        match binding {
            None => {
                self.current = None;
                true
            }
            Some((surface, context)) => {
                let known = self.surfaces.contains_key(&surface) && self.contexts.contains_key(&context);
                if !known || !self.options.make_current_ok {
                    return false;
                }
                self.current = Some((surface, context));
                true
            }
        }
    }

    fn destroy_context(&mut self, display: DisplayHandle, context: ContextHandle) -> bool {
        if display != DISPLAY {
            return false;
        }
        let Some(state) = self.contexts.remove(&context) else {
            return false;
        };
        self.leaked_objects += state.objects.len();
        if self.current.is_some_and(|(_, c)| c == context) {
            self.current = None;
        }
        true
    }

    fn destroy_surface(&mut self, display: DisplayHandle, surface: SurfaceHandle) -> bool {
        if display != DISPLAY || self.surfaces.remove(&surface).is_none() {
            return false;
        }
        if self.current.is_some_and(|(s, _)| s == surface) {
            self.current = None;
        }
        true
    }

    fn resolve_instanced_arrays(&mut self) -> Option<InstancedArrays<Self>> {
        if self.current.is_none() || !self.options.has_extension(gl::EXT_INSTANCED_ARRAYS) {
            return None;
        }
        Some(InstancedArrays {
            draw_arrays_instanced: Self::draw_arrays_instanced_angle,
            draw_elements_instanced: Self::draw_elements_instanced_angle,
            vertex_attrib_divisor: Self::vertex_attrib_divisor_angle,
        })
    }

    fn get_error(&mut self) -> GlEnum {
        self.state()
            .map(|s| std::mem::replace(&mut s.error, gl::NO_ERROR))
            .unwrap_or(gl::NO_ERROR)
    }

    fn get_string(&mut self, name: GlEnum) -> Option<String> {
        let extensions = self.options.extensions.join(" ");
        let state = self.state()?;
        match name {
            gl::VENDOR => Some("lumen".to_string()),
            gl::RENDERER => Some("lumen software rasterizer".to_string()),
            gl::VERSION => Some("OpenGL ES 2.0 lumen".to_string()),
            gl::EXTENSIONS => Some(extensions),
            _ => {
                state.raise(gl::INVALID_ENUM);
                None
            }
        }
    }

    fn create_buffer(&mut self) -> u32 {
        self.create(ObjectKind::Buffer)
    }

    fn create_framebuffer(&mut self) -> u32 {
        self.create(ObjectKind::Framebuffer)
    }

    fn create_renderbuffer(&mut self) -> u32 {
        self.create(ObjectKind::Renderbuffer)
    }

    fn create_texture(&mut self) -> u32 {
        self.create(ObjectKind::Texture)
    }

    fn create_program(&mut self) -> u32 {
        let Some(state) = self.state() else { return 0 };
        let id = state.allocate(ObjectKind::Program);
        state.programs.insert(id, Program::default());
        id
    }

    fn create_shader(&mut self, shader_type: GlEnum) -> u32 {
        let Some(state) = self.state() else { return 0 };
        if shader_type != gl::VERTEX_SHADER && shader_type != gl::FRAGMENT_SHADER {
            state.raise(gl::INVALID_ENUM);
            return 0;
        }
        let id = state.allocate(ObjectKind::Shader);
        state.shaders.insert(
            id,
            Shader {
                ty: shader_type,
                ..Shader::default()
            },
        );
        id
    }

    fn delete_buffer(&mut self, id: u32) {
        self.delete(ObjectKind::Buffer, id);
    }

    fn delete_framebuffer(&mut self, id: u32) {
        self.delete(ObjectKind::Framebuffer, id);
    }

    fn delete_renderbuffer(&mut self, id: u32) {
        self.delete(ObjectKind::Renderbuffer, id);
    }

    fn delete_texture(&mut self, id: u32) {
        self.delete(ObjectKind::Texture, id);
    }

    fn delete_program(&mut self, id: u32) {
        self.delete(ObjectKind::Program, id);
    }

    fn delete_shader(&mut self, id: u32) {
        self.delete(ObjectKind::Shader, id);
    }

    fn pixel_store_i(&mut self, pname: GlEnum, param: i32) {
        let Some(state) = self.state() else { return };
        let slot = match pname {
            gl::UNPACK_ALIGNMENT => &mut state.unpack_alignment,
            gl::PACK_ALIGNMENT => &mut state.pack_alignment,
            _ => {
                state.raise(gl::INVALID_ENUM);
                return;
            }
        };
        if matches!(param, 1 | 2 | 4 | 8) {
            *slot = param;
        } else {
            state.raise(gl::INVALID_VALUE);
        }
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let Some(state) = self.state() else { return };
        if width < 0 || height < 0 {
            state.raise(gl::INVALID_VALUE);
        } else {
            state.viewport = [x, y, width, height];
        }
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        if let Some(state) = self.state() {
            state.clear_color = [r, g, b, a].map(|c| c.clamp(0.0, 1.0));
        }
    }

    fn clear(&mut self, mask: GlEnum) {
        let Some(state) = self.state() else { return };
        let known = gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT | gl::STENCIL_BUFFER_BIT;
        if mask & !known != 0 {
            state.raise(gl::INVALID_VALUE);
            return;
        }
        if mask & gl::COLOR_BUFFER_BIT == 0 || state.framebuffer != 0 {
            return;
        }

        let rgba = state.clear_color.map(|c| (c * 255.0).round() as u8);
        if let Some(surface) = self.surface() {
            let pixels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(&mut surface.color);
            pixels.fill(rgba);
        }
    }

    fn bind_buffer(&mut self, target: GlEnum, id: u32) {
        let Some(state) = self.state() else { return };
        if target != gl::ARRAY_BUFFER && target != gl::ELEMENT_ARRAY_BUFFER {
            state.raise(gl::INVALID_ENUM);
        } else if state.check_bind(ObjectKind::Buffer, id) {
            if target == gl::ARRAY_BUFFER {
                state.array_buffer = id;
            } else {
                state.element_buffer = id;
            }
        }
    }

    fn bind_texture(&mut self, target: GlEnum, id: u32) {
        let Some(state) = self.state() else { return };
        if target != gl::TEXTURE_2D {
            state.raise(gl::INVALID_ENUM);
        } else if state.check_bind(ObjectKind::Texture, id) {
            state.texture = id;
        }
    }

    fn bind_framebuffer(&mut self, target: GlEnum, id: u32) {
        let Some(state) = self.state() else { return };
        if target != gl::FRAMEBUFFER {
            state.raise(gl::INVALID_ENUM);
        } else if state.check_bind(ObjectKind::Framebuffer, id) {
            state.framebuffer = id;
        }
    }

    fn bind_renderbuffer(&mut self, target: GlEnum, id: u32) {
        let Some(state) = self.state() else { return };
        if target != gl::RENDERBUFFER {
            state.raise(gl::INVALID_ENUM);
        } else if state.check_bind(ObjectKind::Renderbuffer, id) {
            state.renderbuffer = id;
        }
    }

    fn buffer_data(&mut self, target: GlEnum, data: &[u8], _usage: GlEnum) {
        let Some(state) = self.state() else { return };
        let bound = match target {
            gl::ARRAY_BUFFER => state.array_buffer,
            gl::ELEMENT_ARRAY_BUFFER => state.element_buffer,
            _ => {
                state.raise(gl::INVALID_ENUM);
                return;
            }
        };
        if bound == 0 {
            state.raise(gl::INVALID_OPERATION);
        } else {
            state.buffer_sizes.insert(bound, data.len());
        }
    }

    fn use_program(&mut self, id: u32) {
        let Some(state) = self.state() else { return };
        if id == 0 {
            state.program = 0;
        } else if state.check_name(ObjectKind::Program, id) {
            if state.programs.get(&id).is_some_and(|p| p.linked) {
                state.program = id;
            } else {
                state.raise(gl::INVALID_OPERATION);
            }
        }
    }

    fn draw_arrays(&mut self, mode: GlEnum, first: i32, count: i32) {
        let Some(state) = self.state() else { return };
        if mode > gl::TRIANGLES + 2 {
            state.raise(gl::INVALID_ENUM);
        } else if first < 0 || count < 0 {
            state.raise(gl::INVALID_VALUE);
        } else {
            self.draw_calls += 1;
        }
    }

    fn tex_image_2d(
        &mut self,
        target: GlEnum,
        level: i32,
        _internal_format: GlEnum,
        width: i32,
        height: i32,
        border: i32,
        format: GlEnum,
        ty: GlEnum,
        pixels: Option<&[u8]>,
    ) {
        let Some(state) = self.state() else { return };
        if target != gl::TEXTURE_2D {
            state.raise(gl::INVALID_ENUM);
            return;
        }
        if level < 0 || width < 0 || height < 0 || border != 0 {
            state.raise(gl::INVALID_VALUE);
            return;
        }
        if state.texture == 0 {
            state.raise(gl::INVALID_OPERATION);
            return;
        }
        let texture = state.texture;
        self.last_upload = Some(Upload {
            texture,
            level,
            x_offset: 0,
            y_offset: 0,
            width,
            height,
            format,
            ty,
            data: pixels.map(<[u8]>::to_vec),
        });
    }

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
    ) {
        let Some(state) = self.state() else { return };
        if target != gl::TEXTURE_2D {
            state.raise(gl::INVALID_ENUM);
            return;
        }
        if level < 0 || x_offset < 0 || y_offset < 0 || width < 0 || height < 0 {
            state.raise(gl::INVALID_VALUE);
            return;
        }
        if state.texture == 0 {
            state.raise(gl::INVALID_OPERATION);
            return;
        }
        let texture = state.texture;
        self.last_upload = Some(Upload {
            texture,
            level,
            x_offset,
            y_offset,
            width,
            height,
            format,
            ty,
            data: Some(pixels.to_vec()),
        });
    }

    fn read_pixels(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: GlEnum,
        ty: GlEnum,
        out: &mut [u8],
    ) {
        let Some(state) = self.state() else { return };
        if format != gl::RGBA || ty != gl::UNSIGNED_BYTE {
            state.raise(gl::INVALID_ENUM);
            return;
        }
        if width < 0 || height < 0 {
            state.raise(gl::INVALID_VALUE);
            return;
        }
        if state.framebuffer != 0 {
            state.raise(gl::INVALID_FRAMEBUFFER_OPERATION);
            return;
        }
        if width == 0 || height == 0 {
            return;
        }

        let align = state.pack_alignment as usize;
        let row_bytes = width as usize * 4;
        let stride = row_bytes.div_ceil(align) * align;
        let needed = stride * (height as usize - 1) + row_bytes;
        if out.len() < needed {
            state.raise(gl::INVALID_OPERATION);
            return;
        }

        let Some(surface) = self.surface() else { return };
        let (sw, sh) = (surface.width as i32, surface.height as i32);
        for row in 0..height {
            let sy = y + row;
            if sy < 0 || sy >= sh {
                continue;
            }
            for col in 0..width {
                let sx = x + col;
                if sx < 0 || sx >= sw {
                    continue;
                }
                let src = (sy as usize * sw as usize + sx as usize) * 4;
                let dst = row as usize * stride + col as usize * 4;
                out[dst..dst + 4].copy_from_slice(&surface.color[src..src + 4]);
            }
        }
    }

    fn renderbuffer_storage(
        &mut self,
        target: GlEnum,
        internal_format: GlEnum,
        width: i32,
        height: i32,
    ) {
        let depth24 = self.options.has_extension(gl::EXT_DEPTH24);
        let depth32 = self.options.has_extension(gl::EXT_DEPTH32);
        let packed = self.options.has_extension(gl::EXT_PACKED_DEPTH_STENCIL);
        let max = self.options.max_surface_size as i32;

        let Some(state) = self.state() else { return };
        let supported = match internal_format {
            gl::DEPTH_COMPONENT16 | gl::RGBA4 => true,
            gl::DEPTH_COMPONENT24_OES => depth24,
            gl::DEPTH_COMPONENT32_OES => depth32,
            gl::DEPTH24_STENCIL8_OES => packed,
            _ => false,
        };
        if target != gl::RENDERBUFFER || !supported {
            state.raise(gl::INVALID_ENUM);
        } else if width < 0 || height < 0 || width > max || height > max {
            state.raise(gl::INVALID_VALUE);
        } else if state.renderbuffer == 0 {
            state.raise(gl::INVALID_OPERATION);
        } else {
            let id = state.renderbuffer;
            state.renderbuffer_formats.insert(id, internal_format);
        }
    }

    fn shader_source(&mut self, shader: u32, source: &str) {
        let Some(state) = self.state() else { return };
        if state.check_name(ObjectKind::Shader, shader) {
            if let Some(entry) = state.shaders.get_mut(&shader) {
                entry.source = source.to_string();
            }
        }
    }

    fn compile_shader(&mut self, shader: u32) {
        let Some(state) = self.state() else { return };
        if !state.check_name(ObjectKind::Shader, shader) {
            return;
        }
        if let Some(entry) = state.shaders.get_mut(&shader) {
            entry.compiled = entry.source.contains("void main");
            entry.log = if entry.compiled {
                String::new()
            } else {
                "ERROR: 0:1: 'main' : function not defined".to_string()
            };
        }
    }

    fn get_shader_parameter(&mut self, shader: u32, pname: GlEnum) -> i32 {
        let Some(state) = self.state() else { return 0 };
        if !state.check_name(ObjectKind::Shader, shader) {
            return 0;
        }
        let Some(entry) = state.shaders.get(&shader) else { return 0 };
        match pname {
            gl::SHADER_TYPE => entry.ty as i32,
            gl::COMPILE_STATUS => entry.compiled as i32,
            gl::DELETE_STATUS => 0,
            _ => {
                state.raise(gl::INVALID_ENUM);
                0
            }
        }
    }

    fn get_shader_info_log(&mut self, shader: u32) -> String {
        let Some(state) = self.state() else { return String::new() };
        if !state.check_name(ObjectKind::Shader, shader) {
            return String::new();
        }
        state
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn attach_shader(&mut self, program: u32, shader: u32) {
        let Some(state) = self.state() else { return };
        if !state.check_name(ObjectKind::Program, program)
            || !state.check_name(ObjectKind::Shader, shader)
        {
            return;
        }
        let ty = state.shaders.get(&shader).map(|s| s.ty);
        let Some(entry) = state.programs.get(&program) else { return };
        // One shader per stage.
        let taken = entry
            .shaders
            .iter()
            .any(|s| state.shaders.get(s).map(|s| s.ty) == ty);
        if taken {
            state.raise(gl::INVALID_OPERATION);
        } else if let Some(entry) = state.programs.get_mut(&program) {
            entry.shaders.push(shader);
        }
    }

    fn link_program(&mut self, program: u32) {
        let Some(state) = self.state() else { return };
        if !state.check_name(ObjectKind::Program, program) {
            return;
        }
        let Some(entry) = state.programs.get(&program) else { return };
        let attached: Vec<&Shader> = entry
            .shaders
            .iter()
            .filter_map(|s| state.shaders.get(s))
            .collect();
        let stage = |ty| attached.iter().any(|s| s.ty == ty && s.compiled);
        let linked = stage(gl::VERTEX_SHADER) && stage(gl::FRAGMENT_SHADER);

        let mut uniforms: Vec<String> = Vec::new();
        if linked {
            for name in attached.iter().flat_map(|s| declared_uniforms(&s.source)) {
                if !uniforms.iter().any(|u| u == name) {
                    uniforms.push(name.to_string());
                }
            }
        }
        if let Some(entry) = state.programs.get_mut(&program) {
            entry.linked = linked;
            entry.uniforms = uniforms;
            entry.values.clear();
        }
    }

    fn get_program_parameter(&mut self, program: u32, pname: GlEnum) -> i32 {
        let Some(state) = self.state() else { return 0 };
        if !state.check_name(ObjectKind::Program, program) {
            return 0;
        }
        let Some(entry) = state.programs.get(&program) else { return 0 };
        match pname {
            gl::LINK_STATUS => entry.linked as i32,
            gl::ATTACHED_SHADERS => entry.shaders.len() as i32,
            gl::ACTIVE_UNIFORMS => entry.uniforms.len() as i32,
            gl::DELETE_STATUS => 0,
            _ => {
                state.raise(gl::INVALID_ENUM);
                0
            }
        }
    }

    fn get_uniform_location(&mut self, program: u32, name: &str) -> i32 {
        let Some(state) = self.state() else { return -1 };
        if !state.check_name(ObjectKind::Program, program) {
            return -1;
        }
        match state.programs.get(&program) {
            Some(entry) if entry.linked => entry
                .uniforms
                .iter()
                .position(|u| u == name)
                .map_or(-1, |i| i as i32),
            _ => {
                state.raise(gl::INVALID_OPERATION);
                -1
            }
        }
    }

    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        ty: GlEnum,
        normalized: bool,
        stride: i32,
        offset: usize,
    ) {
        let Some(state) = self.state() else { return };
        if !state.check_attrib(index) {
            return;
        }
        let known = matches!(
            ty,
            gl::BYTE | gl::UNSIGNED_BYTE | gl::SHORT | gl::UNSIGNED_SHORT | gl::FLOAT
        );
        if !known {
            state.raise(gl::INVALID_ENUM);
        } else if !(1..=4).contains(&size) || !(0..=255).contains(&stride) {
            state.raise(gl::INVALID_VALUE);
        } else if state.array_buffer == 0 && offset != 0 {
            state.raise(gl::INVALID_OPERATION);
        } else {
            let buffer = state.array_buffer;
            state.attribs.insert(
                index,
                AttribPointer {
                    size,
                    ty,
                    normalized,
                    stride,
                    offset,
                    buffer,
                },
            );
        }
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        let Some(state) = self.state() else { return };
        if state.check_attrib(index) {
            state.enabled_attribs.insert(index);
        }
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        let Some(state) = self.state() else { return };
        if state.check_attrib(index) {
            state.enabled_attribs.remove(&index);
        }
    }

    fn uniform_1i(&mut self, location: i32, x: i32) {
        if let Some(state) = self.state() {
            state.set_uniform(location, vec![x as f32]);
        }
    }

    fn uniform_1f(&mut self, location: i32, x: f32) {
        if let Some(state) = self.state() {
            state.set_uniform(location, vec![x]);
        }
    }

    fn uniform_4f(&mut self, location: i32, x: f32, y: f32, z: f32, w: f32) {
        if let Some(state) = self.state() {
            state.set_uniform(location, vec![x, y, z, w]);
        }
    }

    fn uniform_matrix_4fv(&mut self, location: i32, transpose: bool, values: &[f32]) {
        let Some(state) = self.state() else { return };
        if transpose || values.is_empty() || values.len() % 16 != 0 {
            state.raise(gl::INVALID_VALUE);
        } else {
            state.set_uniform(location, values.to_vec());
        }
    }

    fn flush(&mut self) {}

    fn finish(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound() -> SoftwareDriver {
        let mut d = SoftwareDriver::default();
        let display = d.get_display().unwrap();
        assert!(d.initialize(display));
        let config = d.choose_config(display, &ConfigRequest::offscreen()).unwrap();
        let ctx = d.create_context(display, config, CLIENT_VERSION).unwrap();
        let surface = d.create_pbuffer_surface(display, config, 4, 2).unwrap();
        assert!(d.make_current(display, Some((surface, ctx))));
        d
    }

    // ── errors ────────────────────────────────────────────────────────────

    #[test]
    fn first_error_is_sticky_until_queried() {
        let mut d = bound();
        d.viewport(0, 0, -1, 1);
        d.clear(0xdead_0000);
        assert_eq!(d.get_error(), gl::INVALID_VALUE);
        assert_eq!(d.get_error(), gl::NO_ERROR);
    }

    #[test]
    fn gl_calls_without_current_context_are_dropped() {
        let mut d = SoftwareDriver::default();
        assert_eq!(d.create_texture(), 0);
        d.inject_error(gl::INVALID_ENUM);
        assert_eq!(d.get_error(), gl::NO_ERROR);
    }

    // ── objects ───────────────────────────────────────────────────────────

    #[test]
    fn delete_unknown_texture_is_ignored() {
        let mut d = bound();
        d.delete_texture(42);
        assert_eq!(d.get_error(), gl::NO_ERROR);
        assert_eq!(d.deleted_objects(), 0);
    }

    #[test]
    fn delete_unknown_program_raises_invalid_value() {
        let mut d = bound();
        d.delete_program(42);
        assert_eq!(d.get_error(), gl::INVALID_VALUE);
    }

    #[test]
    fn destroying_context_counts_leaked_objects() {
        let mut d = bound();
        d.create_buffer();
        d.create_texture();
        let (_, ctx) = d.current().unwrap();
        assert!(d.destroy_context(DISPLAY, ctx));
        assert_eq!(d.leaked_objects(), 2);
        assert!(d.current().is_none());
    }

    // ── pixels ────────────────────────────────────────────────────────────

    #[test]
    fn clear_then_read_pixels() {
        let mut d = bound();
        d.clear_color(1.0, 0.0, 0.0, 1.0);
        d.clear(gl::COLOR_BUFFER_BIT);
        let mut out = vec![0u8; 4 * 2 * 4];
        d.read_pixels(0, 0, 4, 2, gl::RGBA, gl::UNSIGNED_BYTE, &mut out);
        assert_eq!(d.get_error(), gl::NO_ERROR);
        assert!(out.chunks_exact(4).all(|p| p == [255, 0, 0, 255]));
    }

    #[test]
    fn read_pixels_clips_outside_surface() {
        let mut d = bound();
        d.clear_color(0.0, 0.0, 1.0, 1.0);
        d.clear(gl::COLOR_BUFFER_BIT);
        let mut out = vec![7u8; 4 * 2];
        d.read_pixels(3, 0, 2, 1, gl::RGBA, gl::UNSIGNED_BYTE, &mut out);
        assert_eq!(&out[..4], &[0, 0, 255, 255]);
        assert_eq!(&out[4..], &[7, 7, 7, 7]);
    }

    #[test]
    fn read_pixels_rejects_short_buffer() {
        let mut d = bound();
        let mut out = vec![0u8; 3];
        d.read_pixels(0, 0, 1, 1, gl::RGBA, gl::UNSIGNED_BYTE, &mut out);
        assert_eq!(d.get_error(), gl::INVALID_OPERATION);
    }

    #[test]
    fn renderbuffer_storage_rejects_webgl_depth_stencil_enum() {
        let mut d = bound();
        let rb = d.create_renderbuffer();
        d.bind_renderbuffer(gl::RENDERBUFFER, rb);
        d.renderbuffer_storage(gl::RENDERBUFFER, gl::DEPTH_STENCIL_OES, 4, 4);
        assert_eq!(d.get_error(), gl::INVALID_ENUM);
        d.renderbuffer_storage(gl::RENDERBUFFER, gl::DEPTH24_STENCIL8_OES, 4, 4);
        assert_eq!(d.get_error(), gl::NO_ERROR);
        assert_eq!(d.renderbuffer_format(rb), Some(gl::DEPTH24_STENCIL8_OES));
    }

    // ── shaders / programs ────────────────────────────────────────────────

    const VERTEX: &str = "uniform mat4 u_mvp;\nattribute vec4 a_pos;\nvoid main() { gl_Position = u_mvp * a_pos; }";
    const FRAGMENT: &str = "precision mediump float;\nuniform vec4 u_color;\nuniform float u_fade[2];\nvoid main() { gl_FragColor = u_color; }";

    fn shader(d: &mut SoftwareDriver, ty: GlEnum, source: &str) -> u32 {
        let id = d.create_shader(ty);
        d.shader_source(id, source);
        d.compile_shader(id);
        id
    }

    fn linked(d: &mut SoftwareDriver) -> u32 {
        let program = d.create_program();
        let vs = shader(d, gl::VERTEX_SHADER, VERTEX);
        let fs = shader(d, gl::FRAGMENT_SHADER, FRAGMENT);
        d.attach_shader(program, vs);
        d.attach_shader(program, fs);
        d.link_program(program);
        program
    }

    #[test]
    fn compile_reports_status_and_log() {
        let mut d = bound();
        let good = shader(&mut d, gl::VERTEX_SHADER, VERTEX);
        let bad = shader(&mut d, gl::FRAGMENT_SHADER, "precision mediump float;");
        assert_eq!(d.get_shader_parameter(good, gl::COMPILE_STATUS), 1);
        assert_eq!(d.get_shader_parameter(good, gl::SHADER_TYPE), gl::VERTEX_SHADER as i32);
        assert_eq!(d.get_shader_info_log(good), "");
        assert_eq!(d.get_shader_parameter(bad, gl::COMPILE_STATUS), 0);
        assert!(d.get_shader_info_log(bad).contains("main"));
        assert_eq!(d.get_error(), gl::NO_ERROR);
    }

    #[test]
    fn shader_calls_validate_names() {
        let mut d = bound();
        let program = d.create_program();
        d.shader_source(program, VERTEX);
        assert_eq!(d.get_error(), gl::INVALID_OPERATION);
        d.compile_shader(99);
        assert_eq!(d.get_error(), gl::INVALID_VALUE);
        let vs = shader(&mut d, gl::VERTEX_SHADER, VERTEX);
        d.get_shader_parameter(vs, 0x1234);
        assert_eq!(d.get_error(), gl::INVALID_ENUM);
    }

    #[test]
    fn link_collects_uniforms_from_both_stages() {
        let mut d = bound();
        let program = linked(&mut d);
        assert!(d.program_linked(program));
        assert_eq!(d.get_program_parameter(program, gl::LINK_STATUS), 1);
        assert_eq!(d.get_program_parameter(program, gl::ATTACHED_SHADERS), 2);
        assert_eq!(d.get_program_parameter(program, gl::ACTIVE_UNIFORMS), 3);
        assert_eq!(d.get_uniform_location(program, "u_mvp"), 0);
        assert_eq!(d.get_uniform_location(program, "u_color"), 1);
        assert_eq!(d.get_uniform_location(program, "u_fade"), 2);
        assert_eq!(d.get_uniform_location(program, "missing"), -1);
        assert_eq!(d.get_error(), gl::NO_ERROR);
    }

    #[test]
    fn link_needs_both_compiled_stages() {
        let mut d = bound();
        let program = d.create_program();
        let vs = shader(&mut d, gl::VERTEX_SHADER, VERTEX);
        let fs = shader(&mut d, gl::FRAGMENT_SHADER, "broken");
        d.attach_shader(program, vs);
        d.attach_shader(program, fs);
        d.link_program(program);
        assert!(!d.program_linked(program));
        assert_eq!(d.get_uniform_location(program, "u_mvp"), -1);
        assert_eq!(d.get_error(), gl::INVALID_OPERATION);
        d.use_program(program);
        assert_eq!(d.get_error(), gl::INVALID_OPERATION);
    }

    #[test]
    fn attaching_a_second_shader_of_one_stage_fails() {
        let mut d = bound();
        let program = d.create_program();
        let a = shader(&mut d, gl::VERTEX_SHADER, VERTEX);
        let b = shader(&mut d, gl::VERTEX_SHADER, VERTEX);
        d.attach_shader(program, a);
        d.attach_shader(program, b);
        assert_eq!(d.get_error(), gl::INVALID_OPERATION);
        assert_eq!(d.get_program_parameter(program, gl::ATTACHED_SHADERS), 1);
    }

    #[test]
    fn deleting_a_shader_detaches_it() {
        let mut d = bound();
        let program = d.create_program();
        let vs = shader(&mut d, gl::VERTEX_SHADER, VERTEX);
        d.attach_shader(program, vs);
        d.delete_shader(vs);
        assert_eq!(d.get_program_parameter(program, gl::ATTACHED_SHADERS), 0);
    }

    // ── uniforms / attributes ─────────────────────────────────────────────

    #[test]
    fn uniforms_store_on_the_program_in_use() {
        let mut d = bound();
        let program = linked(&mut d);
        d.use_program(program);
        d.uniform_4f(1, 0.25, 0.5, 0.75, 1.0);
        d.uniform_1f(2, 3.0);
        let identity: Vec<f32> = (0..16).map(|i| if i % 5 == 0 { 1.0 } else { 0.0 }).collect();
        d.uniform_matrix_4fv(0, false, &identity);
        assert_eq!(d.get_error(), gl::NO_ERROR);
        assert_eq!(d.uniform_value(program, 1), Some(&[0.25, 0.5, 0.75, 1.0][..]));
        assert_eq!(d.uniform_value(program, 2), Some(&[3.0][..]));
        assert_eq!(d.uniform_value(program, 0), Some(identity.as_slice()));
    }

    #[test]
    fn uniform_errors() {
        let mut d = bound();
        d.uniform_1i(0, 1);
        assert_eq!(d.get_error(), gl::INVALID_OPERATION);

        let program = linked(&mut d);
        d.use_program(program);
        d.uniform_1i(-1, 1);
        assert_eq!(d.get_error(), gl::NO_ERROR);
        d.uniform_1i(7, 1);
        assert_eq!(d.get_error(), gl::INVALID_OPERATION);
        d.uniform_matrix_4fv(0, false, &[1.0; 15]);
        assert_eq!(d.get_error(), gl::INVALID_VALUE);
        d.uniform_matrix_4fv(0, true, &[1.0; 16]);
        assert_eq!(d.get_error(), gl::INVALID_VALUE);
        assert_eq!(d.uniform_value(program, 0), None);
    }

    #[test]
    fn vertex_attrib_pointer_records_bound_buffer() {
        let mut d = bound();
        let buffer = d.create_buffer();
        d.bind_buffer(gl::ARRAY_BUFFER, buffer);
        d.vertex_attrib_pointer(1, 3, gl::FLOAT, false, 12, 0);
        d.enable_vertex_attrib_array(1);
        assert_eq!(d.get_error(), gl::NO_ERROR);
        assert_eq!(
            d.attrib_pointer(1),
            Some(AttribPointer {
                size: 3,
                ty: gl::FLOAT,
                normalized: false,
                stride: 12,
                offset: 0,
                buffer,
            })
        );
        assert!(d.attrib_enabled(1));
        d.disable_vertex_attrib_array(1);
        assert!(!d.attrib_enabled(1));
    }

    #[test]
    fn vertex_attrib_pointer_validation() {
        let mut d = bound();
        d.vertex_attrib_pointer(16, 3, gl::FLOAT, false, 0, 0);
        assert_eq!(d.get_error(), gl::INVALID_VALUE);
        d.vertex_attrib_pointer(0, 5, gl::FLOAT, false, 0, 0);
        assert_eq!(d.get_error(), gl::INVALID_VALUE);
        d.vertex_attrib_pointer(0, 3, gl::FLOAT, false, -4, 0);
        assert_eq!(d.get_error(), gl::INVALID_VALUE);
        d.vertex_attrib_pointer(0, 3, gl::RGBA, false, 0, 0);
        assert_eq!(d.get_error(), gl::INVALID_ENUM);
        d.vertex_attrib_pointer(0, 3, gl::FLOAT, false, 0, 16);
        assert_eq!(d.get_error(), gl::INVALID_OPERATION);
        d.enable_vertex_attrib_array(16);
        assert_eq!(d.get_error(), gl::INVALID_VALUE);
        assert_eq!(d.attrib_pointer(0), None);
    }

    // ── make current ──────────────────────────────────────────────────────

    #[test]
    fn make_current_fails_for_unknown_handles() {
        let mut d = bound();
        assert!(!d.make_current(DISPLAY, Some((SurfaceHandle(99), ContextHandle(98)))));
    }

    #[test]
    fn config_requires_initialized_display() {
        let mut d = SoftwareDriver::default();
        assert!(d.choose_config(DISPLAY, &ConfigRequest::offscreen()).is_none());
    }
}
