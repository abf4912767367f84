//! CPU reference for `compute.wgsl#julia`.
//!
//! Used for headless snapshots and to pin down what the kernel computes.

use log::trace;
use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSliceMut};

use crate::{
    colour::{Colour, PALETTE_SIZE},
    control::Control,
    error::{Error, Result},
};

/// Iteration cap. Pixels that reach it are treated as inside the set.
pub const MAX_ITERATIONS: u32 = 256;

/// Number of `z = z² + c` steps before `|z| > 2`, or [`MAX_ITERATIONS`].
pub fn escape_time(mut z: [f32; 2], c: [f32; 2]) -> u32 {
    let mut iterations = 0;
    while iterations < MAX_ITERATIONS && z[0] * z[0] + z[1] * z[1] <= 4.0 {
        z = [z[0] * z[0] - z[1] * z[1] + c[0], 2.0 * z[0] * z[1] + c[1]];
        iterations += 1;
    }
    iterations
}

/// Colour for a pixel that took `iterations` steps. The palette is indexed
/// modulo its length; an empty palette shades everything black.
pub fn shade(iterations: u32, color_scroll: i32, palette: &[Colour]) -> Colour {
    if iterations >= MAX_ITERATIONS || palette.is_empty() {
        return Colour::BLACK;
    }
    let index = iterations.wrapping_add(color_scroll as u32) as usize % PALETTE_SIZE;
    palette[index % palette.len()]
}

/// Renders a `x_size * y_size` RGBA8 image, row-major from the upper-left corner.
pub fn render(control: &Control, palette: &[Colour]) -> Result<Vec<[u8; 4]>> {
    control.validate()?;
    if palette.len() != PALETTE_SIZE {
        return Err(Error::layout(format!(
            "expected {} palette entries, got {}",
            PALETTE_SIZE,
            palette.len()
        )));
    }

    trace!("begin julia::render");

    let width = control.x_size as usize;
    let height = control.y_size as usize;
    let c = control.julia_constant();

    let mut pixels = vec![[0, 0, 0, 255]; width * height];
    pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let z = control.pixel_to_world(x as u32, y as u32);
                *pixel = shade(escape_time(z, c), control.color_scroll, palette).to_rgba8();
            }
        });

    trace!("end julia::render");

    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::palette;

    #[test]
    fn origin_with_zero_constant_never_escapes() {
        assert_eq!(escape_time([0.0, 0.0], [0.0, 0.0]), MAX_ITERATIONS);
    }

    #[test]
    fn far_point_escapes_immediately() {
        assert_eq!(escape_time([3.0, 0.0], [0.0, 0.0]), 0);
        assert_eq!(escape_time([1.5, 0.0], [0.0, 0.0]), 1);
    }

    #[test]
    fn shade_scrolls_through_palette() {
        let palette = palette();
        assert_eq!(shade(3, 0, &palette), palette[3]);
        assert_eq!(shade(3, 10, &palette), palette[13]);
        assert_eq!(shade(250, 10, &palette), palette[4]);
        assert_eq!(shade(MAX_ITERATIONS, 10, &palette), Colour::BLACK);
    }

    #[test]
    fn render_fills_the_grid() {
        let palette = palette();
        // Zoomed far out around the origin with c = 0: only the unit disc stays bounded.
        let control = Control::new(40, 20, [-10.0, -5.0], 2.0, 0.0, 0.0);
        let pixels = render(&control, &palette).unwrap();

        assert_eq!(pixels.len(), 40 * 20);
        // Pixel (20, 10) maps to the origin.
        assert_eq!(pixels[10 * 40 + 20], [0, 0, 0, 255]);
        // Pixel (0, 0) maps to (-10, -5) and escapes before the first step.
        assert_eq!(pixels[0], palette[0].to_rgba8());
    }

    #[test]
    fn short_palette_is_rejected_not_indexed() {
        let mut control = Control::new(4, 4, [-10.0, -5.0], 2.0, 0.0, 0.0);
        control.color_scroll = 200;

        let err = render(&control, &[Colour::BLACK; 8]).unwrap_err();
        assert!(matches!(err, Error::Layout(_)));
        assert!(render(&control, &[]).is_err());
    }

    #[test]
    fn shade_stays_within_a_short_palette() {
        let short = [Colour::new(1.0, 0.0, 0.0), Colour::new(0.0, 1.0, 0.0)];
        assert_eq!(shade(0, 201, &short), short[1]);
        assert_eq!(shade(3, 200, &[]), Colour::BLACK);
    }

    #[test]
    fn iteration_cap_matches_shader() {
        let source = include_str!("compute.wgsl");
        assert!(source.contains(&format!("iterations >= {MAX_ITERATIONS}u")));
        assert!(source.contains(&format!("iterations < {MAX_ITERATIONS}u")));
        assert!(source.contains(&format!("% {PALETTE_SIZE}u")));
        assert!(source.contains(&format!("array<vec3<f32>, {PALETTE_SIZE}>")));
    }

    #[test]
    fn render_rejects_invalid_control() {
        let control = Control::new(0, 20, [0.0, 0.0], 1.0, 0.0, 0.0);
        assert!(render(&control, &palette()).is_err());
    }
}
