pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("layout error: {0}")]
    Layout(String),

    #[error("invalid control: {0}")]
    InvalidControl(String),

    #[error("no suitable adapter found")]
    Adapter,

    #[error("device error: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    pub fn invalid_control(msg: impl Into<String>) -> Self {
        Self::InvalidControl(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(Error::layout("x").to_string().contains("layout error:"));
        assert!(Error::invalid_control("x")
            .to_string()
            .contains("invalid control:"));
        assert_eq!(Error::Adapter.to_string(), "no suitable adapter found");
    }

    #[test]
    fn surface_error_converts() {
        let err: Error = wgpu::SurfaceError::Lost.into();
        assert!(err.to_string().starts_with("surface error:"));
    }
}
