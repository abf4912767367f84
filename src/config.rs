use std::path::PathBuf;

use clap::Parser;

use crate::navigation::Sensitivity;

/// Interactive Julia set explorer.
///
/// Left drag pans, right drag alters the equation, the scroll wheel zooms,
/// `R` resets the view and `Esc` quits. Log output is controlled by `RUST_LOG`.
#[derive(Parser, Debug, Clone)]
#[command(name = "wgpu-julia", version)]
pub struct Config {
    /// Initial window width, in logical pixels.
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Initial window height, in logical pixels.
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// World units moved per dragged pixel, at zoom 1.
    #[arg(long, default_value_t = Sensitivity::default().pan_speed)]
    pub pan_speed: f32,

    /// Change of the Julia constant per dragged pixel, at zoom 1.
    #[arg(long, default_value_t = Sensitivity::default().equation_speed)]
    pub equation_speed: f32,

    /// Scroll lines for the zoom factor to reach zero.
    #[arg(long, default_value_t = Sensitivity::default().zoom_step)]
    pub zoom_step: f32,

    /// Render the home view once on the CPU, write it as a PNG and exit.
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,
}

impl Config {
    pub fn sensitivity(&self) -> Sensitivity {
        Sensitivity {
            pan_speed: self.pan_speed,
            equation_speed: self.equation_speed,
            zoom_step: self.zoom_step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_sensitivity() {
        let config = Config::parse_from(["wgpu-julia"]);
        assert_eq!((config.width, config.height), (1000, 800));
        assert_eq!(config.sensitivity(), Sensitivity::default());
        assert!(config.snapshot.is_none());
    }

    #[test]
    fn parses_overrides() {
        let config = Config::parse_from([
            "wgpu-julia",
            "--width",
            "640",
            "--zoom-step",
            "25",
            "--snapshot",
            "out.png",
        ]);
        assert_eq!(config.width, 640);
        assert_eq!(config.sensitivity().zoom_step, 25.0);
        assert_eq!(config.snapshot, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
