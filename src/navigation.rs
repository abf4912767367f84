/*!
Turns user input into the [`Control`] block for the next frame.

The navigator owns the only mutable copy of the block. Every input produces a
candidate block; the candidate replaces the current one only if it still
passes [`Control::validate`], so what reaches the GPU always has a positive grid
and a finite, positive zoom.
*/

use log::{debug, warn};

use crate::{
    control::Control,
    error::{Error, Result},
};

/// Initial and reset view.
pub const HOME_UL_CORNER: [f32; 2] = [-0.152_718_604, -0.899_495_72];
pub const HOME_ZOOM: f32 = 700.0;
pub const HOME_REAL_SCALE: f32 = -0.4;
pub const HOME_IMAG_SCALE: f32 = 0.6;

/// `color_scroll` wraps back to zero once it goes past this.
pub const COLOR_SCROLL_LIMIT: i32 = 256;

/// How strongly input moves the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sensitivity {
    /// World units per dragged pixel, at zoom 1.
    pub pan_speed: f32,
    /// Change of the Julia constant per dragged pixel, at zoom 1.
    pub equation_speed: f32,
    /// Scroll lines for the zoom factor to reach zero. Larger is gentler.
    pub zoom_step: f32,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self {
            pan_speed: 5.0,
            equation_speed: 0.2,
            zoom_step: 50.0,
        }
    }
}

pub struct Navigator {
    control: Control,
    sensitivity: Sensitivity,
    dirty: bool,
}

impl Navigator {
    pub fn new(width: u32, height: u32, sensitivity: Sensitivity) -> Self {
        Self {
            control: Control::new(
                width.max(1) as i32,
                height.max(1) as i32,
                HOME_UL_CORNER,
                HOME_ZOOM,
                HOME_REAL_SCALE,
                HOME_IMAG_SCALE,
            ),
            sensitivity,
            dirty: true,
        }
    }

    pub fn control(&self) -> &Control {
        &self.control
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Forces the next [`Navigator::take_frame`] to produce a frame.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Restores the home view. The grid size and colour scroll are kept.
    pub fn reset(&mut self) {
        self.control.ul_corner = HOME_UL_CORNER;
        self.control.zoom = HOME_ZOOM;
        self.control.real_scale = HOME_REAL_SCALE;
        self.control.imag_scale = HOME_IMAG_SCALE;
        self.dirty = true;
    }

    /// Matches the grid to the framebuffer. A zero-sized (minimised) framebuffer is ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!("ignoring resize to {}x{}", width, height);
            return;
        }
        self.update("resize", |control| {
            control.x_size = width as i32;
            control.y_size = height as i32;
        });
    }

    /// Drags the view by `(dx, dy)` pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let speed = self.sensitivity.pan_speed;
        self.update("pan", |control| {
            let scale = speed / control.zoom;
            control.ul_corner[0] -= dx * scale;
            control.ul_corner[1] -= dy * scale;
        });
    }

    /// Moves the Julia constant: horizontal drag changes the imaginary part, vertical the real part.
    pub fn alter_equation(&mut self, dx: f32, dy: f32) {
        let speed = self.sensitivity.equation_speed;
        self.update("alter_equation", |control| {
            let scale = speed / control.zoom;
            control.imag_scale += dx * scale;
            control.real_scale += dy * scale;
        });
    }

    /// Scales the zoom by `1 - lines / zoom_step`, keeping the world point at
    /// the centre of the grid in place.
    pub fn zoom(&mut self, lines: f32) {
        let step = self.sensitivity.zoom_step;
        self.update("zoom", |control| {
            let half = [control.x_size as f32 / 2.0, control.y_size as f32 / 2.0];
            let centre = [
                control.ul_corner[0] + half[0] / control.zoom,
                control.ul_corner[1] + half[1] / control.zoom,
            ];

            control.zoom *= 1.0 - lines / step;

            control.ul_corner = [
                centre[0] - half[0] / control.zoom,
                centre[1] - half[1] / control.zoom,
            ];
        });
    }

    pub fn advance_color_scroll(&mut self) {
        self.control.color_scroll += 1;
        if self.control.color_scroll > COLOR_SCROLL_LIMIT {
            self.control.color_scroll = 0;
        }
    }

    /// The block for the next frame, if anything changed since the last one.
    /// Each produced frame advances the colour scroll.
    pub fn take_frame(&mut self) -> Option<Control> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        self.advance_color_scroll();
        Some(self.control)
    }

    fn update(&mut self, action: &str, function: impl FnOnce(&mut Control)) {
        let mut candidate = self.control;
        function(&mut candidate);

        if let Err(error) = check(&candidate) {
            warn!("ignoring {}: {}", action, error);
            return;
        }

        if candidate != self.control {
            self.control = candidate;
            self.dirty = true;
        }
    }
}

/// [`Control::validate`], plus a zoom that keeps the image the right way up.
fn check(control: &Control) -> Result<()> {
    control.validate()?;
    if control.zoom < 0.0 {
        return Err(Error::invalid_control(format!(
            "zoom must be positive, got {}",
            control.zoom
        )));
    }
    Ok(())
}
