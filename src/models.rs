use serde::ser::{Serialize, SerializeMap, Serializer};

/// Diagnostic labels in the order the model emits its scores.
pub const CLASS_NAMES: [&str; 14] = [
    "Atelectasis",
    "Cardiomegaly",
    "Effusion",
    "Infiltration",
    "Mass",
    "Nodule",
    "Pneumonia",
    "Pneumothorax",
    "Consolidation",
    "Edema",
    "Emphysema",
    "Fibrosis",
    "Pleural_Thickening",
    "Hernia",
];

/// Per-label percentages, kept in label order.
///
/// Serializes as a JSON object whose keys follow that order.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedLabels(Vec<(&'static str, f32)>);

impl PredictedLabels {
    /// Pairs each score with the label at the same position and scales it to a percentage.
    pub fn from_scores(labels: &[&'static str], scores: &[f32]) -> Self {
        Self(
            labels
                .iter()
                .zip(scores)
                .map(|(&label, &score)| (label, score * 100.0))
                .collect(),
        )
    }

    pub fn get(&self, label: &str) -> Option<f32> {
        self.0
            .iter()
            .find(|(name, _)| *name == label)
            .map(|&(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PredictedLabels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, percentage) in &self.0 {
            map.serialize_entry(label, percentage)?;
        }
        map.end()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct PredictionResponse {
    pub predicted_labels: PredictedLabels,
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_are_scaled_and_paired_in_order() {
        let scores: Vec<f32> = (0..14).map(|i| i as f32 / 20.0).collect();
        let labels = PredictedLabels::from_scores(&CLASS_NAMES, &scores);

        assert_eq!(labels.len(), 14);
        let names: Vec<&str> = labels.iter().map(|(name, _)| name).collect();
        assert_eq!(names, CLASS_NAMES);
        assert_eq!(labels.get("Atelectasis"), Some(0.0));
        assert!((labels.get("Cardiomegaly").unwrap() - 5.0).abs() < 1e-4);
        assert!((labels.get("Hernia").unwrap() - 65.0).abs() < 1e-4);
        assert_eq!(labels.get("Fracture"), None);
    }

    #[test]
    fn test_serialized_keys_keep_label_order() {
        let labels = PredictedLabels::from_scores(&CLASS_NAMES, &[0.5; 14]);
        let json = serde_json::to_string(&PredictionResponse {
            predicted_labels: labels,
        })
        .unwrap();

        let mut last = 0;
        for name in CLASS_NAMES {
            let position = json.find(&format!("\"{}\"", name)).unwrap();
            assert!(position > last, "{} out of order in {}", name, json);
            last = position;
        }
        assert!(json.starts_with("{\"predicted_labels\":{\"Atelectasis\":50.0"));
    }
}
