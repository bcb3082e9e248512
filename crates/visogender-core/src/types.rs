//! Core data types for VisoGender analysis inputs.
//!
//! These types mirror the JSON written by the model-run collaborators: one
//! record per occupation for retrieval bias, one record per image for
//! resolution bias.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Grouping label attached to a retrieval candidate.
///
/// Standard analysis uses `Masculine`/`Feminine` from the dataset; the
/// diff-gender analysis relabels candidates positionally as `Same`/`Diff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderLabel {
    Masculine,
    Feminine,
    Same,
    Diff,
}

impl GenderLabel {
    /// Lowercase name used in JSON keys.
    pub fn as_str(self) -> &'static str {
        match self {
            GenderLabel::Masculine => "masculine",
            GenderLabel::Feminine => "feminine",
            GenderLabel::Same => "same",
            GenderLabel::Diff => "diff",
        }
    }
}

impl fmt::Display for GenderLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw retrieval output for one occupation.
///
/// `logits_list[i]` is the similarity between the neutral occupation sentence
/// and candidate image `i`; `occ_genders[i]` is that image's annotated gender.
/// Entries with `error = true` had an image that could not be scored and carry
/// no usable logits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationResult {
    /// One similarity score per candidate image
    #[serde(default)]
    pub logits_list: Vec<f64>,

    /// Annotated gender per candidate image, aligned with `logits_list`
    #[serde(default)]
    pub occ_genders: Vec<GenderLabel>,

    /// Set when the upstream run failed for this occupation
    #[serde(default)]
    pub error: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialisation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occ: Option<String>,

    /// Participant noun (two-person context)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub par: Option<String>,

    /// Object noun (single-person context)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obj: Option<String>,
}

impl OccupationResult {
    /// Create a successful result from aligned logits and labels.
    pub fn new(logits_list: Vec<f64>, occ_genders: Vec<GenderLabel>) -> Self {
        Self {
            logits_list,
            occ_genders,
            error: false,
            sector: None,
            specialisation: None,
            occ: None,
            par: None,
            obj: None,
        }
    }

    /// Create a failed result that the calculator will skip.
    pub fn failed() -> Self {
        Self {
            error: true,
            ..Self::new(Vec::new(), Vec::new())
        }
    }
}

/// Retrieval results keyed by occupation name.
pub type RetrievalResults = BTreeMap<String, OccupationResult>;

/// Pronoun class used for resolution bias: ground truth or model prediction.
///
/// Declaration order matches the pronoun order `his`, `her`, `their`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Masculine,
    Feminine,
    Neutral,
}

impl Gender {
    /// Position of this class in the pronoun logits.
    pub fn index(self) -> usize {
        match self {
            Gender::Masculine => 0,
            Gender::Feminine => 1,
            Gender::Neutral => 2,
        }
    }

    /// Inverse of [`Gender::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Gender::Masculine),
            1 => Some(Gender::Feminine),
            2 => Some(Gender::Neutral),
            _ => None,
        }
    }
}

/// Scores for the three pronoun variants of one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PronounLogits {
    pub his: f64,
    pub her: f64,
    pub their: f64,
}

impl PronounLogits {
    /// Scores in `his`, `her`, `their` order.
    pub fn as_array(&self) -> [f64; 3] {
        [self.his, self.her, self.their]
    }
}

/// One image's resolution-bias model output.
///
/// Two-person (OP) samples carry a participant and both template orders;
/// single-person (OO) samples carry an object and `logits_list_obj`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionSample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialisation: Option<String>,

    pub occ: String,

    pub occ_gender: Gender,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub par: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub par_gender: Option<Gender>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obj: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logits_list_occ_first: Option<PronounLogits>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logits_list_par_first: Option<PronounLogits>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logits_list_obj: Option<PronounLogits>,
}

/// Resolution samples keyed by image id (e.g. `OP_1`, `OO_1`).
pub type ResolutionSamples = BTreeMap<String, ResolutionSample>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupation_result_from_upstream_json() {
        let json = r#"{
            "sector": "education",
            "specialisation": "institutional",
            "occ": "teacher",
            "occ_genders": ["masculine", "feminine"],
            "par": "student",
            "error": false,
            "logits_list": [0.12, 0.34]
        }"#;
        let result: OccupationResult = serde_json::from_str(json).unwrap();
        assert!(!result.error);
        assert_eq!(result.logits_list, vec![0.12, 0.34]);
        assert_eq!(
            result.occ_genders,
            vec![GenderLabel::Masculine, GenderLabel::Feminine]
        );
        assert_eq!(result.par.as_deref(), Some("student"));
    }

    #[test]
    fn test_failed_occupation_without_logits() {
        let json = r#"{"occ": "baker", "occ_genders": ["masculine"], "error": true}"#;
        let result: OccupationResult = serde_json::from_str(json).unwrap();
        assert!(result.error);
        assert!(result.logits_list.is_empty());
    }

    #[test]
    fn test_unknown_gender_label_rejected() {
        let json = r#"{"occ_genders": ["robot"], "logits_list": [0.1], "error": false}"#;
        assert!(serde_json::from_str::<OccupationResult>(json).is_err());
    }

    #[test]
    fn test_gender_label_serializes_lowercase() {
        let json = serde_json::to_string(&GenderLabel::Diff).unwrap();
        assert_eq!(json, "\"diff\"");
        assert_eq!(GenderLabel::Masculine.to_string(), "masculine");
    }

    #[test]
    fn test_gender_index_roundtrip() {
        for gender in [Gender::Masculine, Gender::Feminine, Gender::Neutral] {
            assert_eq!(Gender::from_index(gender.index()), Some(gender));
        }
        assert_eq!(Gender::from_index(3), None);
    }

    #[test]
    fn test_resolution_sample_op_json() {
        let json = r#"{
            "sector": "education",
            "specialisation": "institutional",
            "occ": "teacher",
            "occ_gender": "masculine",
            "par": "student",
            "par_gender": "masculine",
            "logits_list_occ_first": {"his": 0.337158203125, "her": 0.329345703125, "their": 0.33349609375},
            "logits_list_par_first": {"his": 0.337646484375, "her": 0.329833984375, "their": 0.332763671875},
            "experiment": "CLIP",
            "model_name": "clip",
            "context": "context_OP"
        }"#;
        let sample: ResolutionSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.occ_gender, Gender::Masculine);
        assert_eq!(sample.par_gender, Some(Gender::Masculine));
        assert!(sample.logits_list_obj.is_none());
        let logits = sample.logits_list_occ_first.unwrap();
        assert_eq!(logits.as_array()[0], 0.337158203125);
    }
}
