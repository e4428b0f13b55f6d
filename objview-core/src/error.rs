/// Error types for model loading
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Growable buffer failures
#[derive(Error, Debug)]
pub enum BufferError {
    #[error("failed to allocate room for {requested} more elements")]
    Allocation { requested: usize },
}

/// Fatal load failures. Everything else degrades to diagnostics.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("read error in {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} contains no vertices", .path.display())]
    NoVertices { path: PathBuf },
    #[error(transparent)]
    Allocation(#[from] BufferError),
}

/// Material library failures. Only `Allocation` aborts the enclosing load.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Allocation(#[from] BufferError),
}

/// Texture decoding failures, reported by [`crate::texture::ImageTextureLoader`]
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to decode {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture store is full")]
    Exhausted,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
