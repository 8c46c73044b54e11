// ImageNet class labels, loaded once at startup
use anyhow::{Context, Result};
use std::path::Path;

const EXPECTED_LABELS: usize = 1000;

/// One label per line. Blank lines stay as empty entries so that line
/// positions keep matching class indices.
pub fn parse_labels(content: &str) -> Vec<String> {
    content.lines().map(|line| line.trim().to_string()).collect()
}

/// Read labels from `path`, downloading them from `url` first when the file
/// is missing.
pub async fn load_labels(path: &Path, url: &str) -> Result<Vec<String>> {
    if !path.exists() {
        tracing::info!("Downloading ImageNet labels from {}", url);
        download(path, url).await?;
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read labels from {}", path.display()))?;
    let labels = parse_labels(&content);

    tracing::info!("Loaded {} ImageNet labels", labels.len());
    if labels.len() < EXPECTED_LABELS {
        tracing::warn!(
            "Expected {} labels, got {}; missing classes will be reported as placeholders",
            EXPECTED_LABELS,
            labels.len()
        );
    }

    Ok(labels)
}

async fn download(path: &Path, url: &str) -> Result<()> {
    let response = reqwest::get(url)
        .await
        .context("Failed to request ImageNet labels")?;

    if !response.status().is_success() {
        anyhow::bail!("Label download failed with status {}", response.status());
    }

    let body = response
        .text()
        .await
        .context("Failed to read label download body")?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("Failed to save labels to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels_keeps_line_positions() {
        let labels = parse_labels("tench\n goldfish \n\ngreat white shark\n");
        assert_eq!(labels, vec!["tench", "goldfish", "", "great white shark"]);
        assert_eq!(labels[3], "great white shark");
    }

    #[tokio::test]
    async fn test_load_labels_from_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imagenet_classes.txt");
        std::fs::write(&path, "tench\ngoldfish\n").unwrap();

        // Unreachable URL: the file exists, so no download is attempted.
        let labels = load_labels(&path, "http://127.0.0.1:9/labels.txt")
            .await
            .unwrap();
        assert_eq!(labels.len(), 2);
    }

    #[tokio::test]
    async fn test_load_labels_reports_download_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        assert!(load_labels(&path, "http://127.0.0.1:9/labels.txt").await.is_err());
    }
}
