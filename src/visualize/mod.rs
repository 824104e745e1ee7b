//! Topology visualization.
//!
//! Rendering happens outside this crate; the registry only serves the resulting
//! image. The content type of an [`Image`] can only be PNG or JPEG.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Element;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
const JPEG_MAGIC: &[u8] = &[0xff, 0xd8, 0xff];

/// 1x1 PNG served when no rendered image is configured
const PLACEHOLDER_PNG: &[u8] = include_bytes!("../../assets/placeholder.png");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type.split(';').next().unwrap_or("").trim();
        match mime {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }

    /// Detect the format from the file signature
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_MAGIC) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(JPEG_MAGIC) {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }
}

/// Image is an opaque visualization blob tagged with its format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum VisualizeError {
    #[error("failed to read image {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image {0} is neither PNG nor JPEG")]
    UnsupportedFormat(PathBuf),
}

/// Visualizer produces an image of the current registry contents
#[async_trait]
pub trait Visualizer: Send + Sync {
    async fn render(&self, elements: &[Element]) -> Result<Image, VisualizeError>;
}

/// Serves an image file produced by an external renderer.
/// The file is re-read on every request so the renderer can update it in place.
pub struct FileVisualizer {
    path: PathBuf,
}

impl FileVisualizer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Visualizer for FileVisualizer {
    async fn render(&self, _elements: &[Element]) -> Result<Image, VisualizeError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| VisualizeError::Read {
                path: self.path.clone(),
                source,
            })?;
        let format = ImageFormat::sniff(&bytes)
            .ok_or_else(|| VisualizeError::UnsupportedFormat(self.path.clone()))?;
        Ok(Image { format, bytes })
    }
}

pub struct PlaceholderVisualizer;

#[async_trait]
impl Visualizer for PlaceholderVisualizer {
    async fn render(&self, _elements: &[Element]) -> Result<Image, VisualizeError> {
        Ok(Image {
            format: ImageFormat::Png,
            bytes: PLACEHOLDER_PNG.to_vec(),
        })
    }
}
