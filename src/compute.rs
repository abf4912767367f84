use crate::error::{Error, Result};

/// Workgroup size for `compute.wgsl#julia`.
pub const WORKGROUP_SIZE_X: u32 = 8;

/// Workgroup size for `compute.wgsl#julia`.
pub const WORKGROUP_SIZE_Y: u32 = 8;

/**
Dispatch size for `compute.wgsl#julia`

[WGSL compute shader workgroups reference](https://www.w3.org/TR/WGSL/#compute-shader-workgroups)

The kernel runs one invocation per pixel, indexed by `global_invocation_id.xy`.
With `@workgroup_size(8, 8, 1)` a dispatch of `(x, y, 1)` covers a grid of
`8x * 8y` invocations, so each dimension is rounded up to the next multiple of 8.
The invocations that fall outside `x_size`/`y_size` return early in the shader.

At 8 pixels per workgroup the
[maxComputeWorkgroupsPerDimension](https://www.w3.org/TR/webgpu/#dom-supported-limits-maxcomputeworkgroupsperdimension)
limit of 65535 is only reached past half a million pixels per side.
*/
pub fn dispatch_size(x_size: i32, y_size: i32) -> Result<(u32, u32, u32)> {
    if x_size <= 0 || y_size <= 0 {
        return Err(Error::invalid_control(format!(
            "cannot dispatch over a {x_size}x{y_size} grid"
        )));
    }
    let x = (x_size as u32).div_ceil(WORKGROUP_SIZE_X);
    let y = (y_size as u32).div_ceil(WORKGROUP_SIZE_Y);
    Ok((x, y, 1))
}
