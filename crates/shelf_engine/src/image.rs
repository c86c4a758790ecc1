use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::Engine;
use thiserror::Error;

/// Largest picture accepted for upload.
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to read image {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("image {0:?} is empty")]
    Empty(PathBuf),
    #[error("image is {actual} bytes, limit is {max_bytes}")]
    TooLarge { max_bytes: u64, actual: u64 },
}

/// `image/{extension}` from the file name, `image/jpeg` when there is none.
pub fn image_mime_type(path: &Path) -> String {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => format!("image/{}", ext.to_ascii_lowercase()),
        _ => "image/jpeg".to_string(),
    }
}

pub fn encode_data_url(bytes: &[u8], mime_type: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime_type};base64,{encoded}")
}

/// Read a picture from disk and turn it into the data URL the backend uploads.
pub fn load_image_data_url(path: &Path) -> Result<String, ImageError> {
    let bytes = fs::read(path).map_err(|source| ImageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(ImageError::Empty(path.to_path_buf()));
    }
    let actual = bytes.len() as u64;
    if actual > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge {
            max_bytes: MAX_IMAGE_BYTES,
            actual,
        });
    }
    Ok(encode_data_url(&bytes, &image_mime_type(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_follows_extension() {
        assert_eq!(image_mime_type(Path::new("cover.PNG")), "image/png");
        assert_eq!(image_mime_type(Path::new("/tmp/photo.jpg")), "image/jpg");
        assert_eq!(image_mime_type(Path::new("scan")), "image/jpeg");
    }

    #[test]
    fn data_url_is_base64_encoded() {
        assert_eq!(encode_data_url(b"hi", "image/png"), "data:image/png;base64,aGk=");
    }
}
