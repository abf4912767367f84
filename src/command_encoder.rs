pub trait CommandEncoderExt {
    /// Runs `function` between `push_debug_group(label)` and `pop_debug_group()`.
    fn with_debug_group<A>(&mut self, label: &str, function: impl FnOnce(&mut Self) -> A) -> A;

    /// Runs `function` inside a compute pass labelled `label`.
    fn with_compute_pass<'pass, A>(
        &'pass mut self,
        label: &str,
        function: impl FnOnce(&mut wgpu::ComputePass<'pass>) -> A,
    ) -> A;

    /// Runs `function` inside a render pass that clears `target` to black.
    fn with_render_pass<'pass, A>(
        &'pass mut self,
        label: &str,
        target: &'pass wgpu::TextureView,
        function: impl FnOnce(&mut wgpu::RenderPass<'pass>) -> A,
    ) -> A;
}

impl CommandEncoderExt for wgpu::CommandEncoder {
    fn with_debug_group<A>(&mut self, label: &str, function: impl FnOnce(&mut Self) -> A) -> A {
        self.push_debug_group(label);
        let result = function(self);
        self.pop_debug_group();
        result
    }

    fn with_compute_pass<'pass, A>(
        &'pass mut self,
        label: &str,
        function: impl FnOnce(&mut wgpu::ComputePass<'pass>) -> A,
    ) -> A {
        let mut compute_pass = self.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some(label),
        });
        function(&mut compute_pass)
    }

    fn with_render_pass<'pass, A>(
        &'pass mut self,
        label: &str,
        target: &'pass wgpu::TextureView,
        function: impl FnOnce(&mut wgpu::RenderPass<'pass>) -> A,
    ) -> A {
        let mut render_pass = self.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: true,
                },
            })],
            depth_stencil_attachment: None,
        });
        function(&mut render_pass)
    }
}

/// Records commands with `function` and finishes the encoder.
pub fn record(
    device: &wgpu::Device,
    label: &str,
    function: impl FnOnce(&mut wgpu::CommandEncoder),
) -> wgpu::CommandBuffer {
    let mut command_encoder =
        device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) });
    function(&mut command_encoder);
    command_encoder.finish()
}
