// Sprite batching and the textured-quad pipeline

use super::texture::TextureManager;
use super::ScreenUniform;
use crate::engine::assets::{AssetId, Image};
use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};
use std::ops::Range;
use wgpu::util::DeviceExt;

/// Vertex for 2D sprite rendering, in screen pixels
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl SpriteVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    /// Get the vertex buffer layout descriptor
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// A sprite queued for this frame
#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub image: Image,
    /// Screen position of the top-left corner
    pub position: Vec2,
    pub flip_horizontal: bool,
}

/// A run of consecutive quads sharing one texture
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub texture: AssetId,
    pub indices: Range<u32>,
}

/// Quads for one frame, in submission order
#[derive(Debug, Default)]
pub struct SpriteBatch {
    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    batches: Vec<Batch>,
}

impl SpriteBatch {
    /// Build quads for the commands; consecutive sprites using the same
    /// image share one draw call. Submission order is kept so the painter's
    /// order decided by the caller survives batching.
    pub fn build(commands: &[DrawCommand]) -> Self {
        let mut batch = Self {
            vertices: Vec::with_capacity(commands.len() * 4),
            indices: Vec::with_capacity(commands.len() * 6),
            batches: Vec::new(),
        };

        for command in commands {
            batch.push_quad(command);
        }

        batch
    }

    fn push_quad(&mut self, command: &DrawCommand) {
        let min = command.position;
        let max = command.position + command.image.size();
        let (u_left, u_right) = if command.flip_horizontal {
            (1.0, 0.0)
        } else {
            (0.0, 1.0)
        };

        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[
            SpriteVertex {
                position: [min.x, min.y],
                tex_coords: [u_left, 0.0],
            },
            SpriteVertex {
                position: [max.x, min.y],
                tex_coords: [u_right, 0.0],
            },
            SpriteVertex {
                position: [max.x, max.y],
                tex_coords: [u_right, 1.0],
            },
            SpriteVertex {
                position: [min.x, max.y],
                tex_coords: [u_left, 1.0],
            },
        ]);

        let start = self.indices.len() as u32;
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        let end = self.indices.len() as u32;

        let texture = command.image.id();
        match self.batches.last_mut() {
            Some(last) if last.texture == texture => last.indices.end = end,
            _ => self.batches.push(Batch {
                texture,
                indices: start..end,
            }),
        }
    }

    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

/// Orthographic projection mapping screen pixels (y down) to clip space
pub fn screen_projection(width: f32, height: f32) -> Mat4 {
    Mat4::orthographic_rh(0.0, width, height, 0.0, -1.0, 1.0)
}

/// Sprite renderer: one textured-quad pipeline plus the screen uniform
pub struct SpriteRenderer {
    render_pipeline: wgpu::RenderPipeline,
    screen_buffer: wgpu::Buffer,
    screen_bind_group: wgpu::BindGroup,
}

impl SpriteRenderer {
    /// Create a new sprite renderer
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self> {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let screen_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Screen Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[&screen_bind_group_layout, texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[SpriteVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The y-down projection mirrors winding; sprites are never back-facing anyway
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let screen_uniform = ScreenUniform {
            view_proj: screen_projection(config.width as f32, config.height as f32)
                .to_cols_array_2d(),
        };

        let screen_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Screen Buffer"),
            contents: bytemuck::cast_slice(&[screen_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let screen_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Screen Bind Group"),
            layout: &screen_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            render_pipeline,
            screen_buffer,
            screen_bind_group,
        })
    }

    /// Upload a new projection after a resize
    pub fn update_screen(&self, queue: &wgpu::Queue, width: f32, height: f32) {
        let uniform = ScreenUniform {
            view_proj: screen_projection(width, height).to_cols_array_2d(),
        };
        queue.write_buffer(&self.screen_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Draw a prepared batch. Every texture it references must already be
    /// uploaded to `textures`.
    pub fn render<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        batch: &SpriteBatch,
        vertex_buffer: &'a wgpu::Buffer,
        index_buffer: &'a wgpu::Buffer,
        textures: &'a TextureManager,
    ) {
        if batch.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.screen_bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        for run in batch.batches() {
            let Some(texture) = textures.get(run.texture) else {
                log::warn!("Skipping sprite batch with missing texture {:?}", run.texture);
                continue;
            };
            render_pass.set_bind_group(1, &texture.bind_group, &[]);
            render_pass.draw_indexed(run.indices.clone(), 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use image::RgbaImage;

    fn image(name: &str, width: u32, height: u32) -> Image {
        Image::new(AssetId::from_path(name), RgbaImage::new(width, height))
    }

    fn command(image: &Image, x: f32, y: f32, flip: bool) -> DrawCommand {
        DrawCommand {
            image: image.clone(),
            position: Vec2::new(x, y),
            flip_horizontal: flip,
        }
    }

    #[test]
    fn test_quad_covers_image() {
        let sky = image("sky", 40, 20);
        let batch = SpriteBatch::build(&[command(&sky, 10.0, 5.0, false)]);

        let positions: Vec<[f32; 2]> = batch.vertices().iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![[10.0, 5.0], [50.0, 5.0], [50.0, 25.0], [10.0, 25.0]]
        );
        assert_eq!(batch.indices(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_flip_swaps_u() {
        let kuro = image("kuro", 8, 8);
        let batch = SpriteBatch::build(&[
            command(&kuro, 0.0, 0.0, false),
            command(&kuro, 0.0, 0.0, true),
        ]);

        let vertices = batch.vertices();
        assert_eq!(vertices[0].tex_coords, [0.0, 0.0]);
        assert_eq!(vertices[1].tex_coords, [1.0, 0.0]);
        assert_eq!(vertices[4].tex_coords, [1.0, 0.0]);
        assert_eq!(vertices[5].tex_coords, [0.0, 0.0]);
    }

    #[test]
    fn test_consecutive_same_texture_merges() {
        let tile = image("tile", 48, 48);
        let kuro = image("kuro", 115, 115);
        let batch = SpriteBatch::build(&[
            command(&tile, 0.0, 0.0, false),
            command(&tile, 48.0, 0.0, false),
            command(&kuro, 10.0, 10.0, false),
            command(&tile, 96.0, 0.0, false),
        ]);

        assert_eq!(
            batch.batches(),
            &[
                Batch {
                    texture: tile.id(),
                    indices: 0..12
                },
                Batch {
                    texture: kuro.id(),
                    indices: 12..18
                },
                Batch {
                    texture: tile.id(),
                    indices: 18..24
                },
            ]
        );
    }

    #[test]
    fn test_empty_batch() {
        let batch = SpriteBatch::build(&[]);
        assert!(batch.is_empty());
        assert!(batch.vertices().is_empty());
    }

    #[test]
    fn test_screen_projection_corners() {
        let proj = screen_projection(1200.0, 800.0);

        let top_left = proj * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let bottom_right = proj * Vec4::new(1200.0, 800.0, 0.0, 1.0);

        assert!((top_left.x + 1.0).abs() < 1e-5 && (top_left.y - 1.0).abs() < 1e-5);
        assert!((bottom_right.x - 1.0).abs() < 1e-5 && (bottom_right.y + 1.0).abs() < 1e-5);
    }
}
