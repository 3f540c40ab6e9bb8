use serde::{Deserialize, Serialize};

/// Full diagnosis payload returned by `POST /api/predict`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PredictionResponse {
    pub class_index: usize,
    pub class_labels: Vec<String>,
    pub probabilities: Vec<f32>,
    pub confidence: f32,
    pub diagnosis: DiagnosisInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DiagnosisInfo {
    pub name: String,
    pub description: String,
    pub symptoms: Vec<String>,
    pub treatment: TreatmentInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TreatmentInfo {
    pub description: String,
    pub medicines: Vec<String>,
}
