//! Static diagnosis table keyed by model class index.
//!
//! The entry order must match the label order the model was trained with.

use lazy_static::lazy_static;

use crate::error::{InferenceError, Result};

#[derive(Debug, Clone)]
pub struct Treatment {
    pub description: String,
    pub medicines: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DiagnosisRecord {
    pub name: String,
    pub description: String,
    pub symptoms: Vec<String>,
    pub treatment: Treatment,
}

impl DiagnosisRecord {
    pub fn to_info(&self) -> shared::DiagnosisInfo {
        shared::DiagnosisInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            symptoms: self.symptoms.clone(),
            treatment: shared::TreatmentInfo {
                description: self.treatment.description.clone(),
                medicines: self.treatment.medicines.clone(),
            },
        }
    }
}

fn record(
    name: &str,
    description: &str,
    symptoms: &[&str],
    treatment_description: &str,
    medicines: &[&str],
) -> DiagnosisRecord {
    DiagnosisRecord {
        name: name.to_string(),
        description: description.to_string(),
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        treatment: Treatment {
            description: treatment_description.to_string(),
            medicines: medicines.iter().map(|s| s.to_string()).collect(),
        },
    }
}

lazy_static! {
    static ref DIAGNOSES: Vec<DiagnosisRecord> = vec![
        record(
            "Cataract Disease",
            "Cataract disease is a clouding of the eye's lens that affects vision. It is usually caused by aging and may lead to blurry vision, sensitivity to light, and more. Cataract surgery is the most common treatment, where the cloudy lens is removed and replaced with an artificial one. Consult an ophthalmologist for proper diagnosis and treatment.",
            &[
                "Blurred vision",
                "Double vision",
                "Sensitivity to light",
                "Difficulty seeing at night",
            ],
            "Cataract surgery is the most common treatment, where the cloudy lens is removed and replaced with an artificial one. Consult an ophthalmologist for proper diagnosis and treatment.",
            &["Artificial Tears", "Anti-inflammatory Eye Drops"],
        ),
        record(
            "Diabetic Retinopathy Disease",
            "Diabetic retinopathy is a diabetes complication that affects the eyes. It can cause blindness if left untreated. Symptoms include blurred or distorted central vision and blank spots. Treatment options may include laser therapy, medication, and surgery. Diabetic patients should maintain good blood sugar control and consult an eye specialist.",
            &["Blurred or distorted central vision", "Blank spots"],
            "Treatment options may include laser therapy, medication, and surgery. Diabetic patients should maintain good blood sugar control and consult an eye specialist.",
            &["Anti-VEGF Injections", "Steroid Injections"],
        ),
        record(
            "Glaucoma Disease",
            "Glaucoma is a group of eye diseases that can cause vision loss and blindness. It often has no early symptoms but may lead to tunnel vision, severe eye pain, and blurred vision. Treatment involves reducing intraocular pressure with eye drops, laser treatment, or surgery. Regular eye check-ups are important.",
            &[
                "Tunnel vision",
                "Severe eye pain",
                "Blurred vision",
                "Halos around lights",
            ],
            "Treatment involves reducing intraocular pressure with eye drops, laser treatment, or surgery. Regular eye check-ups are important.",
            &["Prostaglandin Analogues", "Beta-Blockers"],
        ),
        record(
            "Normal Eye",
            "Normal eye without any detected diseases.",
            &[],
            "No specific treatment needed for a normal eye.",
            &[],
        ),
        record(
            "Ocular Disease",
            "Ocular disease refers to various eye conditions that may not fit specific categories. Symptoms vary depending on the specific disease.",
            &[],
            "Treatment varies depending on the specific ocular disease. Consult an eye specialist for proper diagnosis and treatment.",
            &["Specific Medications Depending on the Disease"],
        ),
        record(
            "Retina Disease",
            "Retina disease affects the retina, the layer of tissue at the back of the inner eye. It may cause blurry or distorted central vision, seeing floaters, or dark spots. Treatment depends on the specific condition and may include medication, laser therapy, or surgery. Consult an eye specialist.",
            &[
                "Blurry or distorted central vision",
                "Seeing floaters",
                "Dark spots",
            ],
            "Treatment depends on the specific condition and may include medication, laser therapy, or surgery. Consult an eye specialist.",
            &["Anti-VEGF Injections", "Corticosteroids"],
        ),
    ];
}

/// Resolves a model class index to its diagnosis entry.
pub fn for_class(index: usize) -> Result<&'static DiagnosisRecord> {
    DIAGNOSES
        .get(index)
        .ok_or(InferenceError::ClassOutOfRange(index))
}

pub fn class_count() -> usize {
    DIAGNOSES.len()
}

pub fn class_names() -> Vec<String> {
    DIAGNOSES.iter().map(|r| r.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_classes_in_label_order() {
        assert_eq!(class_count(), 6);
        assert_eq!(
            class_names(),
            vec![
                "Cataract Disease",
                "Diabetic Retinopathy Disease",
                "Glaucoma Disease",
                "Normal Eye",
                "Ocular Disease",
                "Retina Disease",
            ]
        );
    }

    #[test]
    fn test_every_entry_has_name_and_description() {
        for index in 0..class_count() {
            let entry = for_class(index).unwrap();
            assert!(!entry.name.is_empty());
            assert!(!entry.description.is_empty());
            assert!(!entry.treatment.description.is_empty());
        }
    }

    #[test]
    fn test_symptom_counts_match_reference_table() {
        let counts: Vec<usize> = (0..class_count())
            .map(|i| for_class(i).unwrap().symptoms.len())
            .collect();
        assert_eq!(counts, vec![4, 2, 4, 0, 0, 3]);
    }

    #[test]
    fn test_normal_eye_has_no_symptoms_or_medicines() {
        let normal = for_class(3).unwrap();
        assert_eq!(normal.name, "Normal Eye");
        assert!(normal.symptoms.is_empty());
        assert!(normal.treatment.medicines.is_empty());
    }

    #[test]
    fn test_out_of_range_index_is_an_error() {
        let err = for_class(6).unwrap_err();
        assert!(matches!(err, InferenceError::ClassOutOfRange(6)));
    }
}
