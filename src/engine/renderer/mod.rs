// Rendering system using wgpu

mod camera;
mod display;
mod sprite;
pub mod texture;

pub use camera::Camera;
pub use display::{Display, Drawable, Sprite};
pub use sprite::{DrawCommand, SpriteBatch, SpriteRenderer};
pub use texture::TextureManager;

#[cfg(test)]
pub(crate) use camera::tests::RecordingDisplay;

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use log::{info, warn};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Projection uniform for screen-space sprites
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ScreenUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Main renderer: owns the wgpu surface and turns queued sprites into a frame
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    sprite_renderer: SpriteRenderer,
    texture_manager: TextureManager,
    /// Sprites presented since the last flip
    commands: Vec<DrawCommand>,
}

impl Renderer {
    /// Create a new renderer for the given window
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface
        let surface = instance.create_surface(window.clone())?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        info!("Using GPU: {}", adapter.get_info().name);

        // Request device and queue
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let texture_manager = TextureManager::new(&device);
        let sprite_renderer =
            SpriteRenderer::new(&device, &config, texture_manager.bind_group_layout())?;

        info!(
            "Renderer initialized with {}x{} resolution",
            size.width, size.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            sprite_renderer,
            texture_manager,
            commands: Vec::new(),
        })
    }

    /// Resize the renderer
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.sprite_renderer.update_screen(
                &self.queue,
                new_size.width as f32,
                new_size.height as f32,
            );
            info!("Renderer resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Number of textures on the GPU
    pub fn texture_count(&self) -> usize {
        self.texture_manager.texture_count()
    }

    fn render(&mut self) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring the next frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        for command in &self.commands {
            self.texture_manager
                .ensure_uploaded(&self.device, &self.queue, &command.image);
        }

        let batch = SpriteBatch::build(&self.commands);
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sprite Vertex Buffer"),
                contents: bytemuck::cast_slice(batch.vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sprite Index Buffer"),
                contents: bytemuck::cast_slice(batch.indices()),
                usage: wgpu::BufferUsages::INDEX,
            });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.sprite_renderer.render(
                &mut render_pass,
                &batch,
                &vertex_buffer,
                &index_buffer,
                &self.texture_manager,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl Display for Renderer {
    fn size(&self) -> (u32, u32) {
        (self.size.width, self.size.height)
    }

    fn present(&mut self, sprite: Sprite<'_>, position: Vec2) {
        self.commands.push(DrawCommand {
            image: sprite.image.clone(),
            position,
            flip_horizontal: sprite.flip_horizontal,
        });
    }

    fn flip(&mut self) -> Result<()> {
        let result = self.render();
        self.commands.clear();
        result
    }
}
