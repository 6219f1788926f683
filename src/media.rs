//! Image output handling
//!
//! Image-mode replies are either a remote URL or an inline
//! `data:<mime>;base64,<payload>` URL. Inline images can be decoded and
//! written to disk; remote URLs are only displayed.

use crate::{Error, Result};
use base64::Engine as _;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub data: Vec<u8>,
}

pub fn is_data_url(value: &str) -> bool {
    value.starts_with("data:")
}

impl DataUrl {
    pub fn parse(value: &str) -> Result<Self> {
        let rest = value
            .strip_prefix("data:")
            .ok_or_else(|| Error::MalformedResponse("Not a data URL".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::MalformedResponse("Data URL has no payload".to_string()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| Error::MalformedResponse("Data URL is not base64 encoded".to_string()))?;

        let data = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;

        Ok(Self {
            mime: mime.to_string(),
            data,
        })
    }

    /// File extension from the decoded bytes, falling back to the declared type.
    pub fn extension(&self) -> &'static str {
        match detect_image_mime(&self.data).unwrap_or(self.mime.as_str()) {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            other => {
                tracing::warn!("Unrecognized image type {}, saving as png", other);
                "png"
            }
        }
    }
}

pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        _ => None,
    }
}

/// Short form of an image reference for terminal display.
pub fn describe_image(output: &str) -> String {
    if !is_data_url(output) {
        return output.to_string();
    }

    match DataUrl::parse(output) {
        Ok(image) => format!("inline {} ({} bytes)", image.mime, image.data.len()),
        Err(_) => "inline image (undecodable)".to_string(),
    }
}

/// Writes inline images as `<session_id>-<n>.<ext>` under one directory.
pub struct ImageSaver {
    dir: PathBuf,
    session_id: String,
    saved: usize,
}

impl ImageSaver {
    pub fn new(dir: PathBuf, session_id: &str) -> Self {
        Self {
            dir,
            session_id: session_id.to_string(),
            saved: 0,
        }
    }

    /// Save `output` if it is an inline image. Remote URLs yield `None`.
    pub fn save(&mut self, output: &str) -> Result<Option<PathBuf>> {
        if !is_data_url(output) {
            return Ok(None);
        }

        let image = DataUrl::parse(output)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(format!(
            "{}-{}.{}",
            self.session_id,
            self.saved + 1,
            image.extension()
        ));
        fs::write(&path, &image.data)?;
        self.saved += 1;

        tracing::info!("Saved image ({} bytes) to {}", image.data.len(), path.display());
        Ok(Some(path))
    }
}
