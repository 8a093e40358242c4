use anyhow::{Context, Result};
use image::{Rgba, imageops};
use snaptext_types::{ImageBuffer, Region};

type RgbaView = image::ImageBuffer<Rgba<u8>, Vec<u8>>;

/// Copy the given sub-region out of an RGBA snapshot. The region is clamped
/// to the snapshot bounds.
pub fn crop(src: &ImageBuffer, rect: Region) -> Result<ImageBuffer> {
    let view: RgbaView = RgbaView::from_raw(src.width, src.height, src.data.clone())
        .context("snapshot buffer does not match its dimensions")?;

    let x = rect.x.min(src.width);
    let y = rect.y.min(src.height);
    let width = rect.width.min(src.width - x);
    let height = rect.height.min(src.height - y);

    let cropped = imageops::crop_imm(&view, x, y, width, height).to_image();
    Ok(ImageBuffer::new(
        cropped.width(),
        cropped.height(),
        cropped.into_raw(),
    ))
}
