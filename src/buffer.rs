/*!
Typed, read-only `wgpu` storage buffers.

Nothing stops you from writing a bunch of `B`s into a buffer that's "supposed to"
contain `A`s once everything is bytes. [`Buffer`] carries the element type so
the binding and the upload agree.
*/

use std::{marker::PhantomData, mem::size_of};

use wgpu::util::DeviceExt;

pub struct Buffer<A> {
    buffer: wgpu::Buffer,
    len: usize,
    phantom_data: PhantomData<A>,
}

impl<A: bytemuck::Pod> Buffer<A> {
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }

    pub fn binding_size(&self) -> Option<wgpu::BufferSize> {
        wgpu::BufferSize::new((self.len * size_of::<A>()) as u64)
    }
}

pub struct Builder<'a, A> {
    label: Option<&'a str>,
    contents: &'a [A],
}

impl<'a, A: bytemuck::Pod> From<&'a [A]> for Builder<'a, A> {
    fn from(contents: &'a [A]) -> Self {
        Self {
            label: None,
            contents,
        }
    }
}

impl<'a, A: bytemuck::Pod> Builder<'a, A> {
    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn create(self, device: &wgpu::Device) -> Buffer<A> {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: self.label,
            contents: bytemuck::cast_slice(self.contents),
            usage: wgpu::BufferUsages::STORAGE,
        });

        Buffer {
            buffer,
            len: self.contents.len(),
            phantom_data: PhantomData,
        }
    }
}
