//! TorchScript model loading and forward inference.

use std::sync::{Arc, Mutex};

use ndarray::Array2;
use tch::{CModule, Device, Kind, Tensor};

use crate::diagnosis::{self, DiagnosisRecord};
use crate::error::Result;

/// The trained fundus classifier, loaded once at startup and shared read-only.
#[derive(Clone)]
pub struct FundusModel {
    module: Arc<Mutex<CModule>>,
    device: Device,
}

impl FundusModel {
    pub fn load(model_path: &str) -> Result<Self> {
        let device = Device::cuda_if_available();
        let module = CModule::load_on_device(model_path, device)?;
        Ok(Self {
            module: Arc::new(Mutex::new(module)),
            device,
        })
    }

    /// Runs one forward pass and returns the softmaxed class distribution.
    pub fn forward(&self, input: &Array2<f32>) -> Result<Vec<f32>> {
        let (rows, cols) = input.dim();
        let flat: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_slice(&flat)
            .view([rows as i64, cols as i64])
            .to_device(self.device);

        let output = self.module.lock().unwrap().forward_ts(&[tensor])?;
        let output = output.softmax(-1, Kind::Float);
        let output_flat = output.to_kind(Kind::Float).view([-1]);
        let num_elements = output_flat.size()[0] as usize;
        let mut probabilities = vec![0.0f32; num_elements];
        output_flat.copy_data(&mut probabilities, num_elements);
        Ok(probabilities)
    }
}

/// Outcome of a single classification, bundled for the HTTP layer.
pub struct Prediction {
    pub class_index: usize,
    pub probabilities: Vec<f32>,
    pub confidence: f32,
    pub record: &'static DiagnosisRecord,
}

/// Classifier plus diagnosis enrichment over the loaded model.
#[derive(Clone)]
pub struct Classifier {
    model: FundusModel,
}

impl Classifier {
    pub fn new(model: FundusModel) -> Self {
        Self { model }
    }

    pub fn classify(&self, input: &Array2<f32>) -> Result<Prediction> {
        let probabilities = self.model.forward(input)?;
        let class_index = argmax(&probabilities).unwrap_or(0);
        let record = diagnosis::for_class(class_index)?;
        let confidence = probabilities.get(class_index).copied().unwrap_or(0.0) * 100.0;
        Ok(Prediction {
            class_index,
            probabilities,
            confidence,
            record,
        })
    }
}

/// Index of the largest value; ties resolve to the lowest index.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_selects_largest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&[0.9, 0.05, 0.05]), Some(0));
    }

    #[test]
    fn test_argmax_tie_breaks_to_lowest_index() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some(1));
        assert_eq!(argmax(&[0.5, 0.5, 0.5]), Some(0));
    }

    #[test]
    fn test_argmax_empty_input() {
        assert_eq!(argmax(&[]), None);
    }
}
