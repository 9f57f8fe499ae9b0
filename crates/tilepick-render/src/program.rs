//! The picking program: pipeline, per-draw uniforms and their bind group.

use tilepick_core::{DrawUniforms, MAX_ITEMS_PER_PASS};

use crate::error::{RenderError, RenderResult};
use crate::target::{COLOR_FORMAT, DEPTH_FORMAT};

/// GPU uniforms of one picking draw.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct PickingUniforms {
    /// Model transform of the item.
    pub model_matrix: [[f32; 4]; 4],
    /// View-projection times model transform.
    pub combined_matrix: [[f32; 4]; 4],
    /// Fragments farther than this are discarded; `0.0` disables fog.
    pub fog_distance: f32,
    /// Fade of the item; fully faded items are discarded.
    pub fade: f32,
    /// Normalized red channel of this draw.
    pub index_ordinal: f32,
    /// Padding to align to 16 bytes.
    pub _padding: f32,
}

impl PickingUniforms {
    /// Packs the uniforms of one draw.
    pub fn new(draw: &DrawUniforms, fog_distance: f32) -> Self {
        Self {
            model_matrix: draw.model_matrix.to_cols_array_2d(),
            combined_matrix: draw.combined_matrix.to_cols_array_2d(),
            fog_distance,
            fade: draw.fade,
            index_ordinal: draw.index_ordinal,
            _padding: 0.0,
        }
    }
}

/// Size of [`PickingUniforms`] in bytes.
pub const UNIFORM_SIZE: u64 = std::mem::size_of::<PickingUniforms>() as u64;

/// Vertex buffer layouts: positions in slot 0, picking colors in slot 1.
pub const VERTEX_BUFFERS: [wgpu::VertexBufferLayout<'static>; 2] = [
    wgpu::VertexBufferLayout {
        array_stride: 12, // vec3<f32> position
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        }],
    },
    wgpu::VertexBufferLayout {
        array_stride: 4, // RGBA8 picking color
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Unorm8x4,
            offset: 0,
            shader_location: 1,
        }],
    },
];

/// Rounds `value` up to a multiple of `alignment`.
pub fn align_up(value: u64, alignment: u64) -> u64 {
    value.div_ceil(alignment) * alignment
}

/// The dedicated picking pipeline.
///
/// Holds one uniform slot per possible draw of a pass; draws select their
/// slot through a dynamic offset.
pub struct PickingProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    slot_stride: u64,
    released: bool,
}

impl PickingProgram {
    /// Compiles the picking shader and creates the pipeline.
    pub fn new(device: &wgpu::Device) -> RenderResult<Self> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Picking Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/picking.wgsl").into()),
        });

        let slot_stride = align_up(
            UNIFORM_SIZE,
            u64::from(device.limits().min_uniform_buffer_offset_alignment),
        );
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Picking Uniform Buffer"),
            size: slot_stride * MAX_ITEMS_PER_PASS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Picking Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(UNIFORM_SIZE),
                    },
                    count: None,
                }],
            });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Picking Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(UNIFORM_SIZE),
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Picking Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Picking Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &VERTEX_BUFFERS,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: COLOR_FORMAT,
                    blend: None, // No blending for pick buffer
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..wgpu::PrimitiveState::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::ShaderCompilationFailed(error.to_string()));
        }

        Ok(Self {
            pipeline,
            bind_group,
            uniform_buffer,
            slot_stride,
            released: false,
        })
    }

    /// Byte offset of uniform slot `slot`.
    pub fn slot_offset(&self, slot: usize) -> u32 {
        (slot as u64 * self.slot_stride) as u32
    }

    /// Uploads the uniforms of every draw, one slot each, in order.
    ///
    /// Must happen before the pass that uses them is submitted.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, draws: &[DrawUniforms], fog_distance: f32) {
        if self.released || draws.is_empty() {
            return;
        }

        let stride = self.slot_stride as usize;
        let count = draws.len().min(MAX_ITEMS_PER_PASS);
        let mut data = vec![0u8; stride * count];
        for (slot, draw) in draws.iter().take(count).enumerate() {
            let uniforms = PickingUniforms::new(draw, fog_distance);
            let start = slot * stride;
            data[start..start + UNIFORM_SIZE as usize]
                .copy_from_slice(bytemuck::bytes_of(&uniforms));
        }
        queue.write_buffer(&self.uniform_buffer, 0, &data);
    }

    /// Binds the picking pipeline to `pass`.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
    }

    /// Selects the uniform slot of the next draw.
    pub fn bind_slot(&self, pass: &mut wgpu::RenderPass<'_>, slot: usize) {
        pass.set_bind_group(0, &self.bind_group, &[self.slot_offset(slot)]);
    }

    /// Returns whether [`release`](Self::release) has run.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Frees the uniform buffer. Later calls are no-ops.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.uniform_buffer.destroy();
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};
    use proptest::prelude::*;
    use tilepick_core::ItemHandle;

    #[test]
    fn test_uniform_layout() {
        // Two mat4x4<f32> plus four f32, matching the WGSL struct
        assert_eq!(UNIFORM_SIZE, 144);
        assert_eq!(std::mem::offset_of!(PickingUniforms, combined_matrix), 64);
        assert_eq!(std::mem::offset_of!(PickingUniforms, fog_distance), 128);
        assert_eq!(std::mem::offset_of!(PickingUniforms, index_ordinal), 136);
    }

    #[test]
    fn test_uniforms_from_draw() {
        let handle = ItemHandle::new(9).unwrap();
        let model = Mat4::from_translation(Vec3::new(4.0, 5.0, 6.0));
        let draw = DrawUniforms::new(handle, model, Mat4::IDENTITY, 0.75);
        let uniforms = PickingUniforms::new(&draw, 1500.0);

        assert_eq!(uniforms.model_matrix[3], [4.0, 5.0, 6.0, 1.0]);
        assert_eq!(uniforms.combined_matrix, uniforms.model_matrix);
        assert!((uniforms.fog_distance - 1500.0).abs() < f32::EPSILON);
        assert!((uniforms.fade - 0.75).abs() < f32::EPSILON);
        assert!((uniforms.index_ordinal - 10.0 / 256.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_vertex_layouts() {
        assert_eq!(VERTEX_BUFFERS[0].array_stride, 12);
        assert_eq!(VERTEX_BUFFERS[1].array_stride, 4);
        assert_eq!(VERTEX_BUFFERS[1].attributes[0].format, wgpu::VertexFormat::Unorm8x4);
    }

    proptest! {
        #[test]
        fn prop_align_up(value in 0u64..1_000_000, shift in 0u32..10) {
            let alignment = 1u64 << shift;
            let aligned = align_up(value, alignment);
            prop_assert_eq!(aligned % alignment, 0);
            prop_assert!(aligned >= value);
            prop_assert!(aligned - value < alignment);
        }
    }
}
