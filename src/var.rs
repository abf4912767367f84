//! A single [`bytemuck::Pod`] value living in a uniform buffer.

use std::marker::PhantomData;

use wgpu::util::DeviceExt;

pub struct Var<A> {
    buffer: wgpu::Buffer,
    phantom_data: PhantomData<A>,
}

impl<A: bytemuck::Pod> Var<A> {
    /// Replaces the value. Takes effect for commands submitted after this call.
    pub fn write(&self, queue: &wgpu::Queue, contents: &A) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(contents));
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }

    /// Size of `A` as seen by the device, for `min_binding_size`.
    pub fn binding_size() -> Option<wgpu::BufferSize> {
        wgpu::BufferSize::new(std::mem::size_of::<A>() as u64)
    }
}

pub struct Builder<'a, A> {
    label: Option<&'a str>,
    contents: A,
}

impl<'a, A: bytemuck::Pod> Builder<'a, A> {
    pub fn new(contents: A) -> Self {
        Self {
            label: None,
            contents,
        }
    }

    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn create(self, device: &wgpu::Device) -> Var<A> {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: self.label,
            contents: bytemuck::bytes_of(&self.contents),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Var {
            buffer,
            phantom_data: PhantomData,
        }
    }
}
