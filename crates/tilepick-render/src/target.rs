//! Offscreen pick target.
//!
//! A fixed-resolution color + depth target, independent of the window size,
//! so picking cost stays bounded whatever the display resolution. Reading
//! back copies a single pixel through a small staging buffer.

use tilepick_core::codec::BACKGROUND;
use tilepick_core::{PickError, TargetSize};

use crate::error::RenderResult;

/// Color format of the pick target (exact 8-bit channels).
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Depth format of the pick target.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Staging row size; texture-to-buffer copies need aligned rows.
const READBACK_ROW_BYTES: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

/// Clear color of the target: the no-hit background.
pub fn clear_color() -> wgpu::Color {
    let [r, g, b, a] = BACKGROUND.map(|c| f64::from(c) / 255.0);
    wgpu::Color { r, g, b, a }
}

/// Checks that a target of `size` fits the device's 2D texture limit.
pub fn check_target_size(size: TargetSize, max_dimension: u32) -> RenderResult<()> {
    if size.width > max_dimension || size.height > max_dimension {
        return Err(PickError::InvalidTargetSize {
            width: size.width,
            height: size.height,
        }
        .into());
    }
    Ok(())
}

struct TargetResources {
    color_texture: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    staging_buffer: wgpu::Buffer,
}

/// Color + depth render target for the picking pass.
pub struct OffscreenTarget {
    size: TargetSize,
    resources: Option<TargetResources>,
}

impl OffscreenTarget {
    /// Allocates the target textures and the readback buffer.
    pub fn new(device: &wgpu::Device, size: TargetSize) -> Self {
        let extent = wgpu::Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        };

        let color_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Pick Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Pick Depth Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        // One aligned row, we only read 4 bytes
        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pick Staging Buffer"),
            size: u64::from(READBACK_ROW_BYTES),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        log::debug!("pick target allocated at {}x{}", size.width, size.height);

        Self {
            size,
            resources: Some(TargetResources {
                color_texture,
                color_view,
                depth_texture,
                depth_view,
                staging_buffer,
            }),
        }
    }

    /// Resolution of the target.
    pub fn size(&self) -> TargetSize {
        self.size
    }

    /// Returns whether [`release`](Self::release) has run.
    pub fn is_released(&self) -> bool {
        self.resources.is_none()
    }

    /// Begins the offscreen pass: redirects drawing into this target, clears
    /// it to the background, and sets the viewport to the target resolution.
    ///
    /// Dropping the returned pass ends it. Returns `None` once released.
    pub fn enable<'e>(&self, encoder: &'e mut wgpu::CommandEncoder) -> Option<wgpu::RenderPass<'e>> {
        let resources = self.resources.as_ref()?;

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Pick Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &resources.color_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color()),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &resources.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });
        pass.set_viewport(
            0.0,
            0.0,
            self.size.width as f32,
            self.size.height as f32,
            0.0,
            1.0,
        );
        Some(pass)
    }

    /// Submits `encoder` followed by a copy of pixel `(x, y)`, and returns
    /// its RGBA bytes.
    ///
    /// Blocks until the GPU has finished. Returns `None` when the target has
    /// been released, the pixel is out of range, or mapping fails.
    pub fn read_pixel(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        mut encoder: wgpu::CommandEncoder,
        x: u32,
        y: u32,
    ) -> Option<[u8; 4]> {
        let resources = self.resources.as_ref()?;
        if !self.size.contains(x, y) {
            return None;
        }

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &resources.color_texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &resources.staging_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(READBACK_ROW_BYTES),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = resources.staging_buffer.slice(..4);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        let _ = device.poll(wgpu::PollType::wait_indefinitely());
        if let Err(err) = rx.recv().ok()? {
            log::warn!("pick readback mapping failed: {err}");
            return None;
        }

        let data = buffer_slice.get_mapped_range();
        let pixel = [data[0], data[1], data[2], data[3]];
        drop(data);
        resources.staging_buffer.unmap();

        Some(pixel)
    }

    /// Frees the GPU memory of the target. Later calls are no-ops, and
    /// later reads return `None`.
    pub fn release(&mut self) {
        if let Some(resources) = self.resources.take() {
            resources.color_texture.destroy();
            resources.depth_texture.destroy();
            resources.staging_buffer.destroy();
            log::debug!("pick target released");
        }
    }
}

impl Drop for OffscreenTarget {
    fn drop(&mut self) {
        self.release();
    }
}
