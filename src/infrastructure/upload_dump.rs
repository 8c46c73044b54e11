// Debug dumps of accepted uploads
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Write `bytes` base64-encoded to `<dir>/<uuid>.b64` and return the path.
pub async fn dump_upload(dir: &Path, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create dump directory {}", dir.display()))?;

    let path = dir.join(format!("{}.b64", uuid::Uuid::new_v4()));
    tokio::fs::write(&path, encode_base64(bytes))
        .await
        .with_context(|| format!("Failed to write upload dump {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dump_upload_writes_base64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dump_upload(&dir.path().join("dumps"), b"hello").await.unwrap();

        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("b64"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "aGVsbG8=");
    }
}
