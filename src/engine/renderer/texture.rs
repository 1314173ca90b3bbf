// GPU textures for decoded images

use crate::engine::assets::{AssetId, Image};
use log::debug;
use std::collections::HashMap;

/// An uploaded image with the bind group the sprite pipeline samples it through
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Upload an image's pixels
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        image: &Image,
    ) -> Self {
        let (width, height) = (image.width(), image.height());
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Sprite Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.pixels().as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sprite Texture Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            texture,
            view,
            bind_group,
            width,
            height,
        }
    }
}

/// Uploads images on first use and keeps them keyed by asset id
pub struct TextureManager {
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: HashMap<AssetId, Texture>,
}

impl TextureManager {
    /// Create a new texture manager
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Pixel art: no smoothing
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            bind_group_layout,
            sampler,
            textures: HashMap::new(),
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Upload `image` unless a texture of the same id and size already
    /// exists. A size change replaces the old texture.
    pub fn ensure_uploaded(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, image: &Image) {
        let stored = self
            .textures
            .get(&image.id())
            .map(|texture| (texture.width, texture.height));
        if !needs_upload(stored, image) {
            return;
        }

        let texture = Texture::from_image(
            device,
            queue,
            &self.bind_group_layout,
            &self.sampler,
            image,
        );
        debug!(
            "Uploaded texture {:?} ({}x{})",
            image.id(),
            texture.width,
            texture.height
        );
        self.textures.insert(image.id(), texture);
    }

    /// Get a texture by asset id
    pub fn get(&self, id: AssetId) -> Option<&Texture> {
        self.textures.get(&id)
    }

    /// Get the number of uploaded textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

fn needs_upload(stored: Option<(u32, u32)>, image: &Image) -> bool {
    if image.width() == 0 || image.height() == 0 {
        return false;
    }
    stored != Some((image.width(), image.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn image(width: u32, height: u32) -> Image {
        Image::new(AssetId::from_path("sky"), RgbaImage::new(width, height))
    }

    #[test]
    fn test_new_image_is_uploaded() {
        assert!(needs_upload(None, &image(4, 4)));
    }

    #[test]
    fn test_same_size_is_reused() {
        assert!(!needs_upload(Some((4, 4)), &image(4, 4)));
    }

    #[test]
    fn test_size_change_replaces() {
        assert!(needs_upload(Some((4, 4)), &image(8, 6)));
    }

    #[test]
    fn test_empty_image_skipped() {
        assert!(!needs_upload(None, &image(0, 4)));
    }
}
