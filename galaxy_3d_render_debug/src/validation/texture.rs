/// Texture validation: descriptor limits, image data sizes and sub-resource ranges

use galaxy_3d_render::glam::UVec3;
use galaxy_3d_render::galaxy3d::debug::ValidationErrorKind;
use galaxy_3d_render::galaxy3d::render::{
    RenderingCaps, RenderingFeatures, TextureDesc, TextureType, ImageDesc, ImageFormat,
    DataType, SubTextureDesc, MipRange, image_data_size, full_mip_chain_len,
};
use crate::registry::TextureMeta;
use crate::report::Findings;

/// Features a texture type depends on
fn required_features(texture_type: TextureType) -> RenderingFeatures {
    match texture_type {
        TextureType::Texture1D | TextureType::Texture2D => RenderingFeatures::empty(),
        TextureType::Texture3D => RenderingFeatures::TEXTURES_3D,
        TextureType::TextureCube => RenderingFeatures::CUBE_TEXTURES,
        TextureType::Texture1DArray | TextureType::Texture2DArray => RenderingFeatures::TEXTURE_ARRAYS,
        TextureType::TextureCubeArray => RenderingFeatures::CUBE_TEXTURES | RenderingFeatures::CUBE_TEXTURE_ARRAYS,
        TextureType::Texture2DMS => RenderingFeatures::MULTISAMPLE_TEXTURES,
        TextureType::Texture2DMSArray => RenderingFeatures::MULTISAMPLE_TEXTURES | RenderingFeatures::TEXTURE_ARRAYS,
    }
}

/// Largest extent allowed per dimension for a texture type
fn max_dimension(caps: &RenderingCaps, texture_type: TextureType) -> u32 {
    match texture_type {
        TextureType::Texture1D | TextureType::Texture1DArray => caps.max_texture_1d_size,
        TextureType::Texture3D => caps.max_texture_3d_size,
        TextureType::TextureCube | TextureType::TextureCubeArray => caps.max_texture_cube_size,
        _ => caps.max_texture_2d_size,
    }
}

/// Check a texture descriptor against the capabilities
pub(crate) fn validate_texture_desc(findings: &mut Findings, caps: &RenderingCaps, desc: &TextureDesc) {
    let texture_type = desc.texture_type;

    let required = required_features(texture_type);
    if !caps.has(required) {
        findings.error(
            ValidationErrorKind::UnsupportedFeature,
            format!("{:?} requires features {:?}", texture_type, required - caps.features),
        );
    }

    validate_extent(findings, caps, desc);
    validate_array_layers(findings, caps, desc);
    validate_mip_levels(findings, caps, desc);
    validate_samples(findings, caps, desc);
}

fn validate_extent(findings: &mut Findings, caps: &RenderingCaps, desc: &TextureDesc) {
    let limit = max_dimension(caps, desc.texture_type);
    let dimensions = desc.texture_type.dimensions() as usize;
    let extent = desc.extent.to_array();

    for (axis, (name, size)) in ["width", "height", "depth"].iter().zip(extent).enumerate() {
        if axis < dimensions {
            if size == 0 || size > limit {
                findings.error(
                    ValidationErrorKind::LimitExceeded,
                    format!("{} {} outside [1, {}] for {:?}", name, size, limit, desc.texture_type),
                );
            }
        } else if size != 1 {
            findings.error(
                ValidationErrorKind::InvalidArgument,
                format!("{} must be 1 for {:?}, got {}", name, desc.texture_type, size),
            );
        }
    }

    if desc.texture_type.is_cube() && desc.extent.x != desc.extent.y {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            format!("cube faces must be square, got {}x{}", desc.extent.x, desc.extent.y),
        );
    }
}

fn validate_array_layers(findings: &mut Findings, caps: &RenderingCaps, desc: &TextureDesc) {
    let layers = desc.array_layers;
    if layers == 0 {
        findings.error(ValidationErrorKind::InvalidArgument, "array layer count must not be zero");
        return;
    }

    if !desc.texture_type.is_array() {
        if layers > 1 {
            findings.error(
                ValidationErrorKind::InvalidArgument,
                format!("{:?} is not an array type but has {} layers", desc.texture_type, layers),
            );
        }
        return;
    }

    if desc.layer_count() > caps.max_texture_array_layers {
        findings.error(
            ValidationErrorKind::LimitExceeded,
            format!("{} array layers exceed limit {}", desc.layer_count(), caps.max_texture_array_layers),
        );
    }
    if layers == 1 {
        findings.warn(
            ValidationErrorKind::InvalidArgument,
            format!("{:?} with a single layer", desc.texture_type),
        );
    }
}

fn validate_mip_levels(findings: &mut Findings, caps: &RenderingCaps, desc: &TextureDesc) {
    let mip_levels = desc.mip_levels;
    if mip_levels == 0 {
        findings.error(ValidationErrorKind::InvalidArgument, "mip level count must not be zero");
        return;
    }

    let full_chain = full_mip_chain_len(desc.extent);
    if mip_levels > full_chain {
        findings.error(
            ValidationErrorKind::LimitExceeded,
            format!("{} mip levels exceed the full chain of {} for extent {}", mip_levels, full_chain, desc.extent),
        );
    } else if mip_levels > caps.max_mip_levels {
        findings.error(
            ValidationErrorKind::LimitExceeded,
            format!("{} mip levels exceed limit {}", mip_levels, caps.max_mip_levels),
        );
    }

    if desc.texture_type.is_multisample() && mip_levels != 1 {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            format!("multisample textures have exactly one mip level, got {}", mip_levels),
        );
    }
}

fn validate_samples(findings: &mut Findings, caps: &RenderingCaps, desc: &TextureDesc) {
    if desc.texture_type.is_multisample() {
        if desc.samples == 0 || desc.samples > caps.max_samples {
            findings.error(
                ValidationErrorKind::LimitExceeded,
                format!("sample count {} outside [1, {}]", desc.samples, caps.max_samples),
            );
        }
    } else if desc.samples != 1 {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            format!("{:?} is not a multisample type but has {} samples", desc.texture_type, desc.samples),
        );
    }
}

/// Check that image data components match the texture format (depth vs color)
fn validate_image_format(findings: &mut Findings, desc: &TextureDesc, format: ImageFormat) {
    if desc.format.is_depth() != format.is_depth() {
        findings.error(
            ValidationErrorKind::InvalidArgument,
            format!("image format {:?} is incompatible with texture format {:?}", format, desc.format),
        );
    }
}

/// Check that `data_len` is exactly the size of the described image
fn validate_image_size(
    findings: &mut Findings,
    extent: UVec3,
    layers: u32,
    format: ImageFormat,
    data_type: DataType,
    data_len: usize,
) {
    match image_data_size(extent, layers, format, data_type) {
        Some(expected) if data_len as u64 == expected => {}
        Some(expected) => findings.error(
            ValidationErrorKind::SizeMismatch,
            format!(
                "image data is {} bytes, {}x{}x{} x {} layers of {:?}/{:?} needs {}",
                data_len, extent.x, extent.y, extent.z, layers, format, data_type, expected
            ),
        ),
        None => findings.error(
            ValidationErrorKind::SizeMismatch,
            format!(
                "image data is {} bytes, {}x{}x{} x {} layers of {:?}/{:?} overflows a 64-bit size",
                data_len, extent.x, extent.y, extent.z, layers, format, data_type
            ),
        ),
    }
}

/// Check the level-0 data supplied at creation
pub(crate) fn validate_initial_image(findings: &mut Findings, desc: &TextureDesc, image: &ImageDesc<'_>) {
    if desc.texture_type.is_multisample() {
        findings.error(ValidationErrorKind::InvalidArgument, "multisample textures cannot be initialized with image data");
        return;
    }
    validate_image_format(findings, desc, image.format);
    validate_image_size(findings, desc.mip_extent(0), desc.layer_count(), image.format, image.data_type, image.data.len());
}

fn validate_mip_level(findings: &mut Findings, desc: &TextureDesc, mip_level: u32) -> bool {
    if mip_level >= desc.mip_levels {
        findings.error(
            ValidationErrorKind::LimitExceeded,
            format!("mip level {} out of range, texture has {} levels", mip_level, desc.mip_levels),
        );
        return false;
    }
    true
}

/// Whether a write region covers no texel
pub(crate) fn is_empty_region(region: &SubTextureDesc) -> bool {
    region.extent.min_element() == 0 || region.num_array_layers == 0
}

/// Check a sub-texture write
pub(crate) fn validate_texture_write(
    findings: &mut Findings,
    meta: &TextureMeta,
    region: &SubTextureDesc,
    image: &ImageDesc<'_>,
) {
    let desc = &meta.desc;
    if desc.texture_type.is_multisample() {
        findings.error(ValidationErrorKind::InvalidArgument, "multisample textures cannot be written from the CPU");
        return;
    }
    if !validate_mip_level(findings, desc, region.mip_level) {
        return;
    }
    if is_empty_region(region) {
        findings.warn(ValidationErrorKind::InvalidArgument, "empty write region has no effect");
        return;
    }

    let mip_extent = desc.mip_extent(region.mip_level);
    for (name, offset, size, limit) in [
        ("x", region.offset.x, region.extent.x, mip_extent.x),
        ("y", region.offset.y, region.extent.y, mip_extent.y),
        ("z", region.offset.z, region.extent.z, mip_extent.z),
    ] {
        let in_bounds = offset.checked_add(size).map_or(false, |end| end <= limit);
        if !in_bounds {
            findings.error(
                ValidationErrorKind::BoundsViolation,
                format!("region {} [{}, +{}) exceeds mip {} extent {}", name, offset, size, region.mip_level, limit),
            );
        }
    }

    validate_layer_range(findings, desc, region.base_array_layer, region.num_array_layers);
    validate_image_format(findings, desc, image.format);
    if !findings.has_errors() {
        validate_image_size(findings, region.extent, region.num_array_layers, image.format, image.data_type, image.data.len());
    }
}

/// Check a full mip-level read into `data_len` bytes
pub(crate) fn validate_texture_read(
    findings: &mut Findings,
    meta: &TextureMeta,
    mip_level: u32,
    format: ImageFormat,
    data_type: DataType,
    data_len: usize,
) {
    let desc = &meta.desc;
    if desc.texture_type.is_multisample() {
        findings.error(ValidationErrorKind::InvalidArgument, "multisample textures cannot be read back directly");
        return;
    }
    if !validate_mip_level(findings, desc, mip_level) {
        return;
    }
    validate_image_format(findings, desc, format);
    validate_image_size(findings, desc.mip_extent(mip_level), desc.layer_count(), format, data_type, data_len);
}

/// Whether `[base, base + count)` lies in `[0, total)`; the base must be valid even for an empty range
fn is_sub_range(base: u32, count: u32, total: u32) -> bool {
    base < total && base.checked_add(count).map_or(false, |end| end <= total)
}

fn validate_layer_range(findings: &mut Findings, desc: &TextureDesc, base: u32, count: u32) {
    let layers = desc.layer_count();
    if !is_sub_range(base, count, layers) {
        findings.error(
            ValidationErrorKind::RangeViolation,
            format!("layers [{}, +{}) outside [0, {})", base, count, layers),
        );
    }
}

/// Check a full mip-chain generation
pub(crate) fn validate_generate_mips(findings: &mut Findings, meta: &TextureMeta) {
    if meta.desc.texture_type.is_multisample() {
        findings.error(ValidationErrorKind::InvalidArgument, "cannot generate mip levels of a multisample texture");
    }
}

/// Whether a mip range covers no sub-resource
pub(crate) fn is_empty_mip_range(range: &MipRange) -> bool {
    range.num_mip_levels == 0 || range.num_array_layers == 0
}

/// Check a partial mip generation
pub(crate) fn validate_generate_mips_range(findings: &mut Findings, meta: &TextureMeta, range: &MipRange) {
    validate_generate_mips(findings, meta);

    let mip_levels = meta.desc.mip_levels;
    if !is_sub_range(range.base_mip_level, range.num_mip_levels, mip_levels) {
        findings.error(
            ValidationErrorKind::RangeViolation,
            format!(
                "mip levels [{}, +{}) outside [0, {})",
                range.base_mip_level, range.num_mip_levels, mip_levels
            ),
        );
    }
    validate_layer_range(findings, &meta.desc, range.base_array_layer, range.num_array_layers);

    if is_empty_mip_range(range) {
        findings.warn(ValidationErrorKind::InvalidArgument, "empty mip range has no effect");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
