// Photo service - Upload validation, recognition and mock property analysis
use crate::application::mock_data::SeedSequence;
use crate::application::recognition::RecognitionService;
use crate::domain::photo::{PhotoAnalysis, PlaceAnalysis, Recognition};
use crate::infrastructure::http_response::ApiError;
use crate::infrastructure::mime::{is_image_mime, sniff_mime};
use crate::infrastructure::upload_dump::{dump_upload, encode_base64};
use bytes::Bytes;
use image::{DynamicImage, ImageOutputFormat};
use serde::Serialize;
use serde_json::Value;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("Uploaded file is not an image")]
    NotAnImage { mime: &'static str },
    #[error("could not decode image: {0}")]
    Undecodable(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<PhotoError> for ApiError {
    fn from(err: PhotoError) -> Self {
        match err {
            PhotoError::NotAnImage { mime } => ApiError::UnsupportedMedia {
                mime: mime.to_string(),
            },
            PhotoError::Undecodable(msg) => ApiError::UndecodableImage(msg),
            PhotoError::Internal(e) => ApiError::Internal(e),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PhotoReport {
    pub filename: Option<String>,
    pub mime_type: &'static str,
    #[serde(flatten)]
    pub analysis: PhotoAnalysis,
    pub recognition: Vec<Recognition>,
}

#[derive(Debug, Serialize)]
pub struct PlaceReport {
    pub success: bool,
    pub filename: Option<String>,
    pub analysis: PlaceAnalysis,
    pub recognition: Vec<Recognition>,
    pub image_base64: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct BatchItem {
    pub filename: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<PlaceAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognition: Option<Vec<Recognition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub success: bool,
    pub results: Vec<BatchItem>,
    pub total_processed: usize,
    pub timestamp: String,
}

/// Parse the optional location payload. Malformed JSON, `null` and empty
/// objects all count as "no location".
pub fn parse_location(raw: Option<&str>) -> Option<Value> {
    let value: Value = serde_json::from_str(raw?.trim()).ok()?;
    match &value {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        _ => Some(value),
    }
}

/// Reject anything whose content is not an image, then decode it.
pub fn decode_upload(bytes: &[u8]) -> Result<DynamicImage, PhotoError> {
    let mime = sniff_mime(bytes);
    if !is_image_mime(mime) {
        return Err(PhotoError::NotAnImage { mime });
    }
    image::load_from_memory(bytes).map_err(|e| PhotoError::Undecodable(e.to_string()))
}

pub fn encode_jpeg(image: &DynamicImage) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(image.to_rgb8())
        .write_to(&mut Cursor::new(&mut buffer), ImageOutputFormat::Jpeg(JPEG_QUALITY))?;
    Ok(buffer)
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn epoch_seconds() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

#[derive(Clone)]
pub struct PhotoService {
    recognition: RecognitionService,
    seeds: Arc<SeedSequence>,
    dump_dir: Option<PathBuf>,
}

impl PhotoService {
    pub fn new(
        recognition: RecognitionService,
        seeds: Arc<SeedSequence>,
        dump_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            recognition,
            seeds,
            dump_dir,
        }
    }

    pub fn recognition(&self) -> &RecognitionService {
        &self.recognition
    }

    async fn accept(&self, upload: &Upload) -> Result<DynamicImage, PhotoError> {
        let image = decode_upload(&upload.bytes)?;

        if let Some(dir) = &self.dump_dir {
            match dump_upload(dir, &upload.bytes).await {
                Ok(path) => tracing::debug!("Dumped upload to {}", path.display()),
                Err(e) => tracing::warn!("Failed to dump upload: {:#}", e),
            }
        }

        Ok(image)
    }

    /// Tags, score and feature estimates for a single property photo.
    pub async fn analyze_photo(&self, upload: Upload) -> Result<PhotoReport, PhotoError> {
        let image = self.accept(&upload).await?;
        let mime_type = sniff_mime(&upload.bytes);
        let recognition = self.recognition.recognize_blocking(Arc::new(image)).await;
        let analysis = self.seeds.generator().photo_analysis(epoch_seconds());

        tracing::info!(
            "Analyzed photo {:?}: {} tags, top label {:?}",
            upload.filename,
            analysis.tags.len(),
            recognition.first().map(|r| r.label.as_str())
        );

        Ok(PhotoReport {
            filename: upload.filename,
            mime_type,
            analysis,
            recognition,
        })
    }

    pub async fn analyze_place(
        &self,
        upload: Upload,
        location_data: Option<&str>,
    ) -> Result<PlaceReport, PhotoError> {
        let has_location = parse_location(location_data).is_some();
        let (analysis, recognition, image_base64) = self.place_parts(&upload, has_location).await?;

        Ok(PlaceReport {
            success: true,
            filename: upload.filename,
            analysis,
            recognition,
            image_base64,
            timestamp: now_rfc3339(),
        })
    }

    async fn place_parts(
        &self,
        upload: &Upload,
        has_location: bool,
    ) -> Result<(PlaceAnalysis, Vec<Recognition>, String), PhotoError> {
        let image = Arc::new(self.accept(upload).await?);
        let jpeg = encode_jpeg(&image)?;
        let recognition = self.recognition.recognize_blocking(image).await;
        let analysis = self
            .seeds
            .generator()
            .place_analysis(has_location, now_rfc3339());

        Ok((analysis, recognition, encode_base64(&jpeg)))
    }

    /// Analyze every upload; failures are reported per file, never for the batch.
    pub async fn batch_analyze(&self, uploads: Vec<Upload>, location_data: Option<&str>) -> BatchReport {
        let has_location = parse_location(location_data).is_some();
        let mut results = Vec::with_capacity(uploads.len());

        for upload in uploads {
            let item = match self.place_parts(&upload, has_location).await {
                Ok((analysis, recognition, _)) => BatchItem {
                    filename: upload.filename,
                    success: true,
                    analysis: Some(analysis),
                    recognition: Some(recognition),
                    error: None,
                },
                Err(PhotoError::NotAnImage { .. }) => BatchItem {
                    filename: upload.filename,
                    success: false,
                    analysis: None,
                    recognition: None,
                    error: Some("File is not an image".to_string()),
                },
                Err(e) => {
                    tracing::warn!("Batch item {:?} failed: {}", upload.filename, e);
                    BatchItem {
                        filename: upload.filename,
                        success: false,
                        analysis: None,
                        recognition: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            results.push(item);
        }

        BatchReport {
            success: true,
            total_processed: results.len(),
            results,
            timestamp: now_rfc3339(),
        }
    }
}
