//! GL / WebGL enum values used by the core.
//!
//! Only the values the context layer inspects or rewrites live here; every
//! other enum is forwarded to the driver untouched.

/// Raw GL enum.
pub type GlEnum = u32;

// Errors.
pub const NO_ERROR: GlEnum = 0;
pub const INVALID_ENUM: GlEnum = 0x0500;
pub const INVALID_VALUE: GlEnum = 0x0501;
pub const INVALID_OPERATION: GlEnum = 0x0502;
pub const OUT_OF_MEMORY: GlEnum = 0x0505;
pub const INVALID_FRAMEBUFFER_OPERATION: GlEnum = 0x0506;

// Strings.
pub const VENDOR: GlEnum = 0x1F00;
pub const RENDERER: GlEnum = 0x1F01;
pub const VERSION: GlEnum = 0x1F02;
pub const EXTENSIONS: GlEnum = 0x1F03;

// Pixel and attribute component types.
pub const BYTE: GlEnum = 0x1400;
pub const UNSIGNED_BYTE: GlEnum = 0x1401;
pub const SHORT: GlEnum = 0x1402;
pub const UNSIGNED_SHORT: GlEnum = 0x1403;
pub const FLOAT: GlEnum = 0x1406;
pub const UNSIGNED_SHORT_4_4_4_4: GlEnum = 0x8033;
pub const UNSIGNED_SHORT_5_5_5_1: GlEnum = 0x8034;
pub const UNSIGNED_SHORT_5_6_5: GlEnum = 0x8363;

// Pixel formats.
pub const ALPHA: GlEnum = 0x1906;
pub const RGB: GlEnum = 0x1907;
pub const RGBA: GlEnum = 0x1908;
pub const LUMINANCE: GlEnum = 0x1909;
pub const LUMINANCE_ALPHA: GlEnum = 0x190A;

// Pixel store.
pub const UNPACK_ALIGNMENT: GlEnum = 0x0CF5;
pub const PACK_ALIGNMENT: GlEnum = 0x0D05;
pub const UNPACK_FLIP_Y_WEBGL: GlEnum = 0x9240;
pub const UNPACK_PREMULTIPLY_ALPHA_WEBGL: GlEnum = 0x9241;
pub const UNPACK_COLORSPACE_CONVERSION_WEBGL: GlEnum = 0x9243;
pub const BROWSER_DEFAULT_WEBGL: GlEnum = 0x9244;

// Depth / stencil renderbuffer formats.
pub const DEPTH_COMPONENT16: GlEnum = 0x81A5;
pub const DEPTH_COMPONENT24_OES: GlEnum = 0x81A6;
pub const DEPTH_COMPONENT32_OES: GlEnum = 0x81A7;
pub const DEPTH_STENCIL_OES: GlEnum = 0x84F9;
pub const DEPTH24_STENCIL8_OES: GlEnum = 0x88F0;
pub const RGBA4: GlEnum = 0x8056;

// Targets.
pub const ARRAY_BUFFER: GlEnum = 0x8892;
pub const ELEMENT_ARRAY_BUFFER: GlEnum = 0x8893;
pub const TEXTURE_2D: GlEnum = 0x0DE1;
pub const FRAMEBUFFER: GlEnum = 0x8D40;
pub const RENDERBUFFER: GlEnum = 0x8D41;

// Shaders.
pub const FRAGMENT_SHADER: GlEnum = 0x8B30;
pub const VERTEX_SHADER: GlEnum = 0x8B31;
pub const SHADER_TYPE: GlEnum = 0x8B4F;
pub const DELETE_STATUS: GlEnum = 0x8B80;
pub const COMPILE_STATUS: GlEnum = 0x8B81;
pub const LINK_STATUS: GlEnum = 0x8B82;
pub const ATTACHED_SHADERS: GlEnum = 0x8B85;
pub const ACTIVE_UNIFORMS: GlEnum = 0x8B86;

// Clear mask bits.
pub const DEPTH_BUFFER_BIT: GlEnum = 0x0000_0100;
pub const STENCIL_BUFFER_BIT: GlEnum = 0x0000_0400;
pub const COLOR_BUFFER_BIT: GlEnum = 0x0000_4000;

// Primitives.
pub const POINTS: GlEnum = 0x0000;
pub const LINES: GlEnum = 0x0001;
pub const TRIANGLES: GlEnum = 0x0004;

// Buffer usage.
pub const STATIC_DRAW: GlEnum = 0x88E4;

/// Extensions every context requires at creation.
pub const EXT_PACKED_DEPTH_STENCIL: &str = "GL_OES_packed_depth_stencil";
pub const EXT_INSTANCED_ARRAYS: &str = "GL_ANGLE_instanced_arrays";

/// Optional higher-precision depth extensions, best first.
pub const EXT_DEPTH32: &str = "GL_OES_depth32";
pub const EXT_DEPTH24: &str = "GL_OES_depth24";
