//! Headless rendering to PNG through the CPU reference kernel.

use std::path::Path;

use log::info;

use crate::{
    colour,
    control::Control,
    error::{Error, Result},
    julia,
};

/// Renders `control` and encodes it as an RGBA8 image.
pub fn render(control: &Control) -> Result<image::RgbaImage> {
    let pixels = julia::render(control, &colour::palette())?;
    image::RgbaImage::from_vec(
        control.x_size as u32,
        control.y_size as u32,
        bytemuck::cast_slice(&pixels).to_vec(),
    )
    .ok_or_else(|| Error::layout("pixel buffer does not match the grid size"))
}

pub fn write_png(control: &Control, path: &Path) -> Result<()> {
    let image = render(control)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    info!(
        "wrote {}x{} snapshot to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}
