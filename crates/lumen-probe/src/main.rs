mod cli;

use anyhow::{Context as _, bail, ensure};
use clap::Parser;
use log::info;

use lumen_engine::driver::gl;
use lumen_engine::logging::{LoggingConfig, init_logging};
use lumen_engine::unpack::{PixelFormat, PixelType, required_len};
use lumen_engine::{ContextAttributes, ContextId, ContextManager, PixelStore, SoftwareDriver};

use cli::Cli;

/// Side of the square test texture uploaded into every context.
const TEXTURE_SIZE: usize = 2;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    ensure!(
        PixelStore::ALIGNMENTS.contains(&cli.alignment),
        "alignment must be one of {:?}",
        PixelStore::ALIGNMENTS
    );
    ensure!(cli.width > 0 && cli.height > 0, "drawing buffer must not be empty");

    let mut manager = ContextManager::new(SoftwareDriver::default());

    let mut ids = Vec::with_capacity(cli.contexts);
    for index in 0..cli.contexts {
        let id = manager
            .create_context(cli.width, cli.height, ContextAttributes::default())
            .with_context(|| format!("creating context {index}"))?;
        ids.push(id);
    }
    info!("created {} context(s)", manager.live_count());

    for (index, &id) in ids.iter().enumerate() {
        exercise(&mut manager, &cli, index, id).with_context(|| format!("driving {id}"))?;
    }

    manager.dispose_all();
    info!("all contexts disposed");
    Ok(())
}

/// Clears, uploads and reads back through one context.
fn exercise(
    manager: &mut ContextManager<SoftwareDriver>,
    cli: &Cli,
    index: usize,
    id: ContextId,
) -> anyhow::Result<()> {
    let color = palette(index);
    let mut ctx = manager.context(id)?;

    ctx.pixel_store_i(gl::UNPACK_FLIP_Y_WEBGL, i32::from(cli.flip_y))?;
    ctx.pixel_store_i(gl::UNPACK_PREMULTIPLY_ALPHA_WEBGL, i32::from(cli.premultiply))?;
    let alignment = i32::try_from(cli.alignment).context("alignment out of range")?;
    let width = i32::try_from(cli.width).context("width out of range")?;
    let height = i32::try_from(cli.height).context("height out of range")?;
    ctx.pixel_store_i(gl::UNPACK_ALIGNMENT, alignment)?;

    ctx.viewport(0, 0, width, height)?;
    ctx.clear_color(color[0], color[1], color[2], 1.0)?;
    ctx.clear(gl::COLOR_BUFFER_BIT)?;

    let texture = ctx.create_texture()?;
    ctx.bind_texture(gl::TEXTURE_2D, texture)?;
    let source = test_image(&ctx.pixel_store())?;
    let side = TEXTURE_SIZE as i32;
    ctx.tex_image_2d(
        gl::TEXTURE_2D,
        0,
        gl::RGBA,
        side,
        side,
        0,
        gl::RGBA,
        gl::UNSIGNED_BYTE,
        Some(&source),
    )?;

    let mut pixel = [0u8; 4];
    ctx.read_pixels(0, 0, 1, 1, gl::RGBA, gl::UNSIGNED_BYTE, &mut pixel)?;

    let code = ctx.get_error()?;
    if code != gl::NO_ERROR {
        bail!("driver reported error {code:#06x}");
    }

    println!("{id}: clear -> {pixel:?}");
    if let Some(upload) = manager.driver().last_upload() {
        println!("{id}: uploaded {:?}", upload.data.as_deref().unwrap_or_default());
    }
    Ok(())
}

fn palette(index: usize) -> [f32; 3] {
    const COLORS: [[f32; 3]; 4] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0, 0.0]];
    COLORS[index % COLORS.len()]
}

/// Half-transparent RGBA gradient laid out with the store's row padding.
fn test_image(store: &PixelStore) -> anyhow::Result<Vec<u8>> {
    let len = required_len(store, PixelType::UnsignedByte, PixelFormat::Rgba, TEXTURE_SIZE, TEXTURE_SIZE)?;
    let stride = store
        .row_stride(4, TEXTURE_SIZE)
        .context("test image row stride overflows")?;
    let mut data = vec![0u8; len];
    for row in 0..TEXTURE_SIZE {
        for col in 0..TEXTURE_SIZE {
            let offset = row * stride + col * 4;
            let shade = (64 * (row * TEXTURE_SIZE + col + 1)) as u8;
            data[offset..offset + 4].copy_from_slice(&[shade, 255 - shade, 200, 128]);
        }
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_honours_alignment() {
        let store = PixelStore { unpack_alignment: 8, ..PixelStore::default() };
        assert_eq!(test_image(&store).unwrap().len(), 16);
        let store = PixelStore { unpack_alignment: 1, ..PixelStore::default() };
        assert_eq!(test_image(&store).unwrap().len(), 16);
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let cli = Cli::parse_from(["lumen-probe", "--width", "3000000000"]);
        let mut manager = ContextManager::new(SoftwareDriver::default());
        let id = manager.create_context(4, 4, ContextAttributes::default()).unwrap();
        let err = exercise(&mut manager, &cli, 0, id).unwrap_err();
        assert!(err.to_string().contains("width"));
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from(["lumen-probe", "--contexts", "3", "--flip-y", "--alignment", "8"]);
        assert_eq!(cli.contexts, 3);
        assert!(cli.flip_y);
        assert!(!cli.premultiply);
        assert_eq!(cli.alignment, 8);
    }

    #[test]
    fn every_context_gets_its_clear_color() {
        let cli = Cli::parse_from(["lumen-probe"]);
        let mut manager = ContextManager::new(SoftwareDriver::default());
        let a = manager.create_context(4, 4, ContextAttributes::default()).unwrap();
        let b = manager.create_context(4, 4, ContextAttributes::default()).unwrap();
        exercise(&mut manager, &cli, 0, a).unwrap();
        exercise(&mut manager, &cli, 1, b).unwrap();
        assert_eq!(manager.live_count(), 2);
    }
}
