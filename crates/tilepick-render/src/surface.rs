//! wgpu implementation of the pick surface.

use std::sync::Arc;

use pollster::FutureExt;
use tilepick_core::pass::{DrawCall, PickSurface, PickTarget};
use tilepick_core::{DrawUniforms, PickOptions, TargetPixel, TargetSize};

use crate::error::{RenderError, RenderResult};
use crate::geometry::PickGeometry;
use crate::program::PickingProgram;
use crate::target::{self, OffscreenTarget};

/// Offscreen target and picking program on a wgpu device.
///
/// Commands recorded by [`render`](PickSurface::render) are submitted
/// together with the pixel copy in [`read_pixel`](PickTarget::read_pixel).
pub struct GpuPickSurface {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    target: OffscreenTarget,
    program: PickingProgram,
    recorded: Option<wgpu::CommandEncoder>,
}

impl GpuPickSurface {
    /// Creates the surface on the host's device.
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        options: &PickOptions,
    ) -> RenderResult<Self> {
        options.validate()?;
        target::check_target_size(options.target_size, device.limits().max_texture_dimension_2d)?;
        let program = PickingProgram::new(&device)?;
        let target = OffscreenTarget::new(&device, options.target_size);
        log::info!(
            "pick surface created ({}x{})",
            options.target_size.width,
            options.target_size.height
        );

        Ok(Self {
            device,
            queue,
            target,
            program,
            recorded: None,
        })
    }

    /// Creates the surface on a new device without a window.
    pub async fn request_headless(options: &PickOptions) -> RenderResult<Self> {
        options.validate()?;
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tilepick device (headless)"),
                ..wgpu::DeviceDescriptor::default()
            })
            .await?;

        Self::new(Arc::new(device), Arc::new(queue), options)
    }

    /// Blocking version of [`request_headless`](Self::request_headless).
    pub fn new_headless(options: &PickOptions) -> RenderResult<Self> {
        Self::request_headless(options).block_on()
    }

    /// The device the surface renders on.
    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    /// The queue the surface submits to.
    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    /// The offscreen target.
    pub fn target(&self) -> &OffscreenTarget {
        &self.target
    }

    /// The picking program.
    pub fn program(&self) -> &PickingProgram {
        &self.program
    }
}

impl PickTarget for GpuPickSurface {
    fn target_size(&self) -> TargetSize {
        self.target.size()
    }

    fn read_pixel(&mut self, pixel: TargetPixel) -> Option<[u8; 4]> {
        let encoder = self.recorded.take()?;
        self.target
            .read_pixel(&self.device, &self.queue, encoder, pixel.x, pixel.y)
    }

    fn release(&mut self) {
        self.recorded = None;
        self.program.release();
        self.target.release();
    }
}

impl<I: PickGeometry> PickSurface<I> for GpuPickSurface {
    fn render(&mut self, draws: &[DrawCall<'_, I>], fog_distance: f32) {
        self.recorded = None;
        if self.program.is_released() {
            return;
        }

        let uniforms: Vec<DrawUniforms> = draws.iter().map(|draw| draw.uniforms).collect();
        self.program.write_uniforms(&self.queue, &uniforms, fog_distance);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Pick Encoder"),
            });
        {
            let Some(mut pass) = self.target.enable(&mut encoder) else {
                return;
            };
            self.program.bind(&mut pass);
            for (slot, draw) in draws.iter().enumerate() {
                let vertex_count = draw.item.vertex_count();
                if vertex_count == 0 {
                    continue;
                }
                self.program.bind_slot(&mut pass, slot);
                pass.set_vertex_buffer(0, draw.item.position_buffer().slice(..));
                pass.set_vertex_buffer(1, draw.item.picking_color_buffer().slice(..));
                pass.draw(0..vertex_count, 0..1);
            }
        }
        self.recorded = Some(encoder);
    }
}
