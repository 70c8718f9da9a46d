use crate::bitmap::Bitmap;
use crate::paint::Color;

use super::RenderCtx;

/// A bitmap uploaded to the GPU, ready to bind.
pub(crate) struct GpuTexture {
    _texture: wgpu::Texture,
    pub(crate) bind_group: wgpu::BindGroup,
}

impl GpuTexture {
    /// Uploads `bitmap` as an `Rgba8Unorm` texture.
    ///
    /// Rows are copied in storage order, so texel row 0 is the bottom of the
    /// image. Empty bitmaps upload as a single transparent texel. Returns
    /// `None` when either side exceeds the device's 2D texture limit.
    pub(crate) fn upload(
        ctx: &RenderCtx<'_>,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        bitmap: &Bitmap,
        label: &str,
    ) -> Option<Self> {
        let max = ctx.device.limits().max_texture_dimension_2d;
        if !fits_texture_limit(bitmap.width(), bitmap.height(), max) {
            log::warn!(
                "{label} is {}x{}, larger than the device limit of {max}; not uploaded",
                bitmap.width(),
                bitmap.height()
            );
            return None;
        }

        let placeholder;
        let bitmap = if bitmap.is_empty() {
            placeholder = Bitmap::solid(Color::TRANSPARENT, 1, 1);
            &placeholder
        } else {
            bitmap
        };

        let size = wgpu::Extent3d {
            width: bitmap.width(),
            height: bitmap.height(),
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bitmap.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bitmap.width() * 4),
                rows_per_image: Some(bitmap.height()),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
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

        log::debug!("uploaded texture {label} ({}x{})", bitmap.width(), bitmap.height());
        Some(Self { _texture: texture, bind_group })
    }
}

/// Whether a `width`×`height` texture fits a device whose largest 2D texture
/// side is `max_dimension`.
pub(crate) fn fits_texture_limit(width: u32, height: u32, max_dimension: u32) -> bool {
    width <= max_dimension && height <= max_dimension
}

pub(crate) fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("glint sprite sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}
