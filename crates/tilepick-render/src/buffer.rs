//! Vertex buffers for picking geometry.

use wgpu::util::DeviceExt;

/// Creates a vertex buffer from data.
pub fn create_vertex_buffer<T: bytemuck::Pod>(
    device: &wgpu::Device,
    data: &[T],
    label: Option<&str>,
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label,
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}

/// Creates the position buffer of an item (`Float32x3` per vertex).
pub fn create_position_buffer(device: &wgpu::Device, positions: &[[f32; 3]]) -> wgpu::Buffer {
    create_vertex_buffer(device, positions, Some("Pick Position Buffer"))
}

/// Creates the picking-color buffer of an item (`Unorm8x4` per vertex).
pub fn create_picking_color_buffer(device: &wgpu::Device, colors: &[[u8; 4]]) -> wgpu::Buffer {
    create_vertex_buffer(device, colors, Some("Pick Color Buffer"))
}
