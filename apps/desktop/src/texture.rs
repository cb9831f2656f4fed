//! Decode fetched preview bytes into an egui texture.

use anyhow::{Context, Result};

pub fn texture_from_bytes(
    ctx: &egui::Context,
    name: &str,
    bytes: &[u8],
) -> Result<egui::TextureHandle> {
    let img = image::load_from_memory(bytes).context("decode preview image")?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    let color =
        egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &rgba.into_raw());
    Ok(ctx.load_texture(name.to_string(), color, egui::TextureOptions::LINEAR))
}
