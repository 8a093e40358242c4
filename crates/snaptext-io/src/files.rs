use std::path::Path;

use anyhow::{Context, Result};
use image::ImageEncoder;
use snaptext_types::ImageBuffer;

pub fn encode_png(image: &ImageBuffer) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(
            &image.data,
            image.width,
            image.height,
            image::ExtendedColorType::Rgba8,
        )
        .context("Failed to encode PNG")?;
    Ok(buffer)
}

pub fn save_png(path: &Path, image: &ImageBuffer) -> Result<()> {
    let bytes = encode_png(image)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
