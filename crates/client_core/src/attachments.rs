use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to read '{path}': {source}")]
pub struct AttachmentError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Self-contained `data:` URL for a file's bytes.
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Reads a chosen file and embeds it as a data URL, with the MIME type
/// guessed from the file extension.
pub async fn read_file_as_data_url(path: &Path) -> Result<String, AttachmentError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| AttachmentError {
        path: path.to_path_buf(),
        source,
    })?;
    let mime_type = mime_guess::from_path(path).first_or_octet_stream();
    Ok(to_data_url(mime_type.essence_str(), &bytes))
}
