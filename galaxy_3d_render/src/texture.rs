/// Texture descriptors, image data descriptors and size helpers

use glam::UVec3;

/// Texture dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureType {
    Texture1D,
    Texture2D,
    Texture3D,
    TextureCube,
    Texture1DArray,
    Texture2DArray,
    TextureCubeArray,
    Texture2DMS,
    Texture2DMSArray,
}

impl TextureType {
    /// Returns true for the array variants (layer count may exceed 1)
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            TextureType::Texture1DArray
                | TextureType::Texture2DArray
                | TextureType::TextureCubeArray
                | TextureType::Texture2DMSArray
        )
    }

    /// Returns true for cube and cube-array textures
    pub fn is_cube(&self) -> bool {
        matches!(self, TextureType::TextureCube | TextureType::TextureCubeArray)
    }

    /// Returns true for multisample textures
    pub fn is_multisample(&self) -> bool {
        matches!(self, TextureType::Texture2DMS | TextureType::Texture2DMSArray)
    }

    /// Number of meaningful dimensions (1, 2 or 3)
    pub fn dimensions(&self) -> u32 {
        match self {
            TextureType::Texture1D | TextureType::Texture1DArray => 1,
            TextureType::Texture3D => 3,
            _ => 2,
        }
    }
}

/// Texture storage format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8_UNORM,
    R8G8_UNORM,
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
    R16G16B16A16_SFLOAT,
    R32_SFLOAT,
    R32G32B32A32_SFLOAT,
    D16_UNORM,
    D32_FLOAT,
    D24_UNORM_S8_UINT,
}

impl TextureFormat {
    /// Returns true for depth and depth-stencil formats
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            TextureFormat::D16_UNORM | TextureFormat::D32_FLOAT | TextureFormat::D24_UNORM_S8_UINT
        )
    }

    /// Returns true for formats carrying a stencil component
    pub fn has_stencil(&self) -> bool {
        matches!(self, TextureFormat::D24_UNORM_S8_UINT)
    }
}

/// Component layout of CPU-side image data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    R,
    RG,
    RGB,
    BGR,
    RGBA,
    BGRA,
    Depth,
    DepthStencil,
}

impl ImageFormat {
    /// Number of components per pixel
    pub fn components(&self) -> u32 {
        match self {
            ImageFormat::R | ImageFormat::Depth => 1,
            ImageFormat::RG | ImageFormat::DepthStencil => 2,
            ImageFormat::RGB | ImageFormat::BGR => 3,
            ImageFormat::RGBA | ImageFormat::BGRA => 4,
        }
    }

    /// Returns true for depth and depth-stencil image data
    pub fn is_depth(&self) -> bool {
        matches!(self, ImageFormat::Depth | ImageFormat::DepthStencil)
    }
}

/// Component type of CPU-side image data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float16,
    Float32,
    Float64,
}

impl DataType {
    /// Size in bytes of one component
    pub fn size_bytes(&self) -> u32 {
        match self {
            DataType::Int8 | DataType::UInt8 => 1,
            DataType::Int16 | DataType::UInt16 | DataType::Float16 => 2,
            DataType::Int32 | DataType::UInt32 | DataType::Float32 => 4,
            DataType::Float64 => 8,
        }
    }
}

/// Size in bytes of image data with the given geometry and layout
///
/// Returns `None` when the size does not fit in a `u64`.
pub fn image_data_size(extent: UVec3, layers: u32, format: ImageFormat, data_type: DataType) -> Option<u64> {
    [extent.y, extent.z, layers, format.components(), data_type.size_bytes()]
        .into_iter()
        .try_fold(extent.x as u64, |size, factor| size.checked_mul(factor as u64))
}

/// Number of levels in a full mip chain for the given extent
pub fn full_mip_chain_len(extent: UVec3) -> u32 {
    let largest = extent.x.max(extent.y).max(extent.z).max(1);
    32 - largest.leading_zeros()
}

/// Extent of mip level `mip_level` for a level-0 extent
pub fn mip_extent(extent: UVec3, mip_level: u32) -> UVec3 {
    let shift = mip_level.min(31);
    UVec3::new(
        (extent.x >> shift).max(1),
        (extent.y >> shift).max(1),
        (extent.z >> shift).max(1),
    )
}

/// Descriptor for creating a texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    pub texture_type: TextureType,
    pub format: TextureFormat,
    /// Level-0 extent; unused dimensions must be 1
    pub extent: UVec3,
    /// Array layers (number of cubes for cube arrays; 1 for non-array types)
    pub array_layers: u32,
    /// Number of mip levels allocated
    pub mip_levels: u32,
    /// Sample count (multisample textures only, 1 otherwise)
    pub samples: u32,
}

impl TextureDesc {
    /// Single-mip, single-sample 2D texture
    pub fn new_2d(format: TextureFormat, width: u32, height: u32) -> Self {
        Self {
            texture_type: TextureType::Texture2D,
            format,
            extent: UVec3::new(width, height, 1),
            array_layers: 1,
            mip_levels: 1,
            samples: 1,
        }
    }

    /// Number of 2D images per mip level (array layers times cube faces)
    pub fn layer_count(&self) -> u32 {
        if self.texture_type.is_cube() {
            self.array_layers.saturating_mul(6)
        } else {
            self.array_layers
        }
    }

    /// Extent of the given mip level
    pub fn mip_extent(&self, mip_level: u32) -> UVec3 {
        let extent = mip_extent(self.extent, mip_level);
        if self.texture_type == TextureType::Texture3D {
            extent
        } else {
            // Only 3D textures shrink in depth
            UVec3::new(extent.x, extent.y, 1)
        }
    }
}

/// CPU-side image data passed to or read from a texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageDesc<'a> {
    pub format: ImageFormat,
    pub data_type: DataType,
    pub data: &'a [u8],
}

/// Destination region of a texture write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubTextureDesc {
    pub mip_level: u32,
    /// Texel offset inside the mip level
    pub offset: UVec3,
    /// Texel extent of the region
    pub extent: UVec3,
    /// First array layer (cube faces count as layers)
    pub base_array_layer: u32,
    pub num_array_layers: u32,
}

/// Sub-resource range for mip generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipRange {
    pub base_mip_level: u32,
    pub num_mip_levels: u32,
    pub base_array_layer: u32,
    pub num_array_layers: u32,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
