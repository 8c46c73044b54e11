// Recognition service - Top-3 labels from a pretrained classifier
use crate::domain::photo::Recognition;
use image::DynamicImage;
use std::sync::Arc;

const TOP_K: usize = 3;

/// A loaded image classifier returning raw class indices with probabilities,
/// most probable first.
pub trait ImageClassifier: Send + Sync {
    fn top_k(&self, image: &DynamicImage, k: usize) -> anyhow::Result<Vec<(i64, f32)>>;
}

/// Served whenever the classifier is missing or fails.
pub fn fallback_recognitions() -> Vec<Recognition> {
    vec![
        Recognition::new("interior", 0.85),
        Recognition::new("furniture", 0.72),
        Recognition::new("room", 0.68),
    ]
}

#[derive(Clone)]
pub struct RecognitionService {
    classifier: Option<Arc<dyn ImageClassifier>>,
    labels: Arc<Vec<String>>,
}

impl RecognitionService {
    pub fn new(classifier: Option<Arc<dyn ImageClassifier>>, labels: Vec<String>) -> Self {
        Self {
            classifier,
            labels: Arc::new(labels),
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn labels_loaded(&self) -> bool {
        !self.labels.is_empty()
    }

    /// Map a class index to its label; indices outside the label table or on
    /// a blank line get a placeholder instead of panicking.
    pub fn label_for(&self, class_id: i64) -> String {
        usize::try_from(class_id)
            .ok()
            .and_then(|idx| self.labels.get(idx))
            .filter(|label| !label.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("object_{}", class_id))
    }

    pub fn recognize(&self, image: &DynamicImage) -> Vec<Recognition> {
        let Some(classifier) = &self.classifier else {
            tracing::debug!("No classifier loaded, serving fallback recognition");
            return fallback_recognitions();
        };

        match classifier.top_k(image, TOP_K) {
            Ok(predictions) => predictions
                .into_iter()
                .map(|(class_id, prob)| Recognition::new(self.label_for(class_id), prob))
                .collect(),
            Err(e) => {
                tracing::error!("Error in image recognition: {:#}", e);
                fallback_recognitions()
            }
        }
    }

    /// Run recognition off the async runtime; inference is CPU bound.
    pub async fn recognize_blocking(&self, image: Arc<DynamicImage>) -> Vec<Recognition> {
        let service = self.clone();
        match tokio::task::spawn_blocking(move || service.recognize(&image)).await {
            Ok(results) => results,
            Err(e) => {
                tracing::error!("Recognition task failed: {}", e);
                fallback_recognitions()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) struct FixedClassifier(pub Vec<(i64, f32)>);

    impl ImageClassifier for FixedClassifier {
        fn top_k(&self, _image: &DynamicImage, k: usize) -> anyhow::Result<Vec<(i64, f32)>> {
            Ok(self.0.iter().take(k).copied().collect())
        }
    }

    struct FailingClassifier;

    impl ImageClassifier for FailingClassifier {
        fn top_k(&self, _image: &DynamicImage, _k: usize) -> anyhow::Result<Vec<(i64, f32)>> {
            anyhow::bail!("weights not loaded")
        }
    }

    fn labels() -> Vec<String> {
        vec!["tench".to_string(), "goldfish".to_string(), "great white shark".to_string()]
    }

    fn image() -> DynamicImage {
        DynamicImage::new_rgb8(8, 8)
    }

    #[test]
    fn test_maps_indices_to_labels() {
        let service = RecognitionService::new(
            Some(Arc::new(FixedClassifier(vec![(1, 0.6), (0, 0.3), (2, 0.1)]))),
            labels(),
        );
        let results = service.recognize(&image());
        assert_eq!(
            results,
            vec![
                Recognition::new("goldfish", 0.6),
                Recognition::new("tench", 0.3),
                Recognition::new("great white shark", 0.1),
            ]
        );
    }

    #[test]
    fn test_out_of_range_index_gets_placeholder() {
        let service = RecognitionService::new(
            Some(Arc::new(FixedClassifier(vec![(999, 0.5), (-4, 0.3), (0, 0.2)]))),
            labels(),
        );
        let results = service.recognize(&image());
        assert_eq!(results[0].label, "object_999");
        assert_eq!(results[1].label, "object_-4");
        assert_eq!(results[2].label, "tench");
    }

    #[test]
    fn test_blank_label_keeps_following_indices() {
        let labels = crate::infrastructure::labels::parse_labels("tench\n\ngreat white shark\n");
        let service = RecognitionService::new(
            Some(Arc::new(FixedClassifier(vec![(2, 0.7), (1, 0.3)]))),
            labels,
        );
        let results = service.recognize(&image());
        assert_eq!(results[0].label, "great white shark");
        assert_eq!(results[1].label, "object_1");
    }

    #[test]
    fn test_empty_label_table_never_panics() {
        let service =
            RecognitionService::new(Some(Arc::new(FixedClassifier(vec![(0, 1.0)]))), Vec::new());
        assert!(!service.labels_loaded());
        assert_eq!(service.recognize(&image())[0].label, "object_0");
    }

    #[test]
    fn test_classifier_error_falls_back() {
        let service = RecognitionService::new(Some(Arc::new(FailingClassifier)), labels());
        assert_eq!(service.recognize(&image()), fallback_recognitions());
    }

    #[test]
    fn test_missing_classifier_falls_back() {
        let service = RecognitionService::new(None, labels());
        assert!(!service.model_loaded());
        assert_eq!(service.recognize(&image()), fallback_recognitions());
    }

    #[tokio::test]
    async fn test_recognize_blocking() {
        let service = RecognitionService::new(
            Some(Arc::new(FixedClassifier(vec![(2, 0.9)]))),
            labels(),
        );
        let results = service.recognize_blocking(Arc::new(image())).await;
        assert_eq!(results, vec![Recognition::new("great white shark", 0.9)]);
    }
}
