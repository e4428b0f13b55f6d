/// Texture acquisition
///
/// The parser never decodes images itself. It asks a [`TextureLoader`] for a
/// handle and stores whatever comes back; a failed load leaves the material
/// untextured and is never fatal.

use std::num::NonZeroU32;
use std::path::Path;

use crate::config::TextureConfig;
use crate::error::TextureError;

/// Width and height of the fallback gradient texture
pub const DEFAULT_TEXTURE_SIZE: u32 = 256;

/// Opaque, non-zero texture identifier handed out by a [`TextureLoader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(NonZeroU32);

impl TextureHandle {
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

/// Resolves a texture file into a handle, or `None` on failure
pub trait TextureLoader {
    fn load_texture(&mut self, path: &Path) -> Option<TextureHandle>;
}

/// Loader for geometry-only use: every request fails
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTextureLoader;

impl TextureLoader for NullTextureLoader {
    fn load_texture(&mut self, path: &Path) -> Option<TextureHandle> {
        log::debug!("Texture loading disabled, skipping {}", path.display());
        None
    }
}

/// Decoded RGBA8 pixels ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Horizontal gradient from red on the left to blue on the right
    pub fn gradient(size: u32) -> Self {
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for _y in 0..size {
            for x in 0..size {
                let blue = (x * 255 / size) as u8;
                pixels.extend_from_slice(&[255 - blue, 0, blue, 255]);
            }
        }

        Self {
            width: size,
            height: size,
            pixels,
        }
    }
}

/// Decodes texture files with the `image` crate and keeps them in memory,
/// indexed by the handles it returns.
#[derive(Debug, Default)]
pub struct ImageTextureLoader {
    images: Vec<TextureImage>,
    flip_vertically: bool,
}

impl ImageTextureLoader {
    pub fn new(config: &TextureConfig) -> Self {
        Self {
            images: Vec::new(),
            flip_vertically: config.flip_vertically,
        }
    }

    /// Decode an image file into RGBA8 pixels
    pub fn decode(&self, path: &Path) -> Result<TextureImage, TextureError> {
        let image = image::open(path).map_err(|source| TextureError::Image {
            path: path.to_path_buf(),
            source,
        })?;

        let mut rgba = image.to_rgba8();
        if self.flip_vertically {
            image::imageops::flip_vertical_in_place(&mut rgba);
        }
        let (width, height) = rgba.dimensions();

        Ok(TextureImage {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Store an image and return its handle
    pub fn register(&mut self, image: TextureImage) -> Result<TextureHandle, TextureError> {
        let raw = u32::try_from(self.images.len() + 1).map_err(|_| TextureError::Exhausted)?;
        let handle = TextureHandle::new(raw).ok_or(TextureError::Exhausted)?;
        self.images.push(image);
        Ok(handle)
    }

    /// Register the fallback gradient used for untextured materials
    pub fn register_default(&mut self) -> Result<TextureHandle, TextureError> {
        let handle = self.register(TextureImage::gradient(DEFAULT_TEXTURE_SIZE))?;
        log::info!("Created default gradient texture (handle {})", handle.get());
        Ok(handle)
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&TextureImage> {
        self.images.get(handle.get() as usize - 1)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl TextureLoader for ImageTextureLoader {
    fn load_texture(&mut self, path: &Path) -> Option<TextureHandle> {
        let loaded = self.decode(path).and_then(|image| {
            let (width, height) = (image.width, image.height);
            self.register(image).map(|handle| (handle, width, height))
        });

        match loaded {
            Ok((handle, width, height)) => {
                log::info!(
                    "Loaded texture {} (handle {}, {}x{})",
                    path.display(),
                    handle.get(),
                    width,
                    height
                );
                Some(handle)
            }
            Err(e) => {
                log::warn!("Failed to load texture: {}", e);
                None
            }
        }
    }
}
