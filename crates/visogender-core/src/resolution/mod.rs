//! Resolution bias: does the model resolve the right pronoun for the occupation?
//!
//! Each sample carries the model's scores for the `his` / `her` / `their`
//! variants of a templated sentence. The highest-scoring pronoun is the
//! prediction; it is checked against the annotated gender of the person the
//! pronoun refers to.

pub mod accuracy;

pub use accuracy::{
    overall_accuracy, single_person_accuracy, two_person_accuracy, AccuracyGap,
    TwoPersonAccuracy,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{Gender, PronounLogits, ResolutionSample, ResolutionSamples};

/// Image scenario the samples were drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Context {
    /// Occupation and participant (two people, "OP")
    #[serde(rename = "context_OP")]
    OccupationParticipant,
    /// Occupation and object (one person, "OO")
    #[serde(rename = "context_OO")]
    OccupationObject,
}

/// Prediction for one template order of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOutcome {
    pub predicted: Gender,

    /// The neutral pronoun scored highest
    pub neutral_check: bool,

    /// The predicted pronoun matches the referent's gender
    pub match_truth: bool,
}

impl TemplateOutcome {
    fn new(logits: &PronounLogits, truth: Gender) -> Self {
        let predicted = predicted_gender(logits);
        Self {
            predicted,
            neutral_check: predicted == Gender::Neutral,
            match_truth: predicted == truth,
        }
    }
}

/// Predictions for one sample across the template orders of its context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionOutcome {
    pub context: Context,

    pub occ_gender: Gender,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub par_gender: Option<Gender>,

    /// Occupation-first sentence (object sentence for OO samples)
    pub occ_first: TemplateOutcome,

    /// Participant-first sentence (OP samples only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub par_first: Option<TemplateOutcome>,
}

/// Pronoun class with the highest score; ties go to the earlier of `his`, `her`, `their`.
pub fn predicted_gender(logits: &PronounLogits) -> Gender {
    let scores = logits.as_array();
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = i;
        }
    }
    Gender::from_index(best).unwrap_or(Gender::Masculine)
}

/// Evaluate one sample in the given context.
pub fn analyze_sample(
    id: &str,
    sample: &ResolutionSample,
    context: Context,
) -> AnalysisResult<ResolutionOutcome> {
    let missing = |field: &'static str| AnalysisError::MissingField {
        sample: id.to_string(),
        field,
    };

    match context {
        Context::OccupationParticipant => {
            let par_gender = sample.par_gender.ok_or_else(|| missing("par_gender"))?;
            let occ_first = sample
                .logits_list_occ_first
                .as_ref()
                .ok_or_else(|| missing("logits_list_occ_first"))?;
            let par_first = sample
                .logits_list_par_first
                .as_ref()
                .ok_or_else(|| missing("logits_list_par_first"))?;
            Ok(ResolutionOutcome {
                context,
                occ_gender: sample.occ_gender,
                par_gender: Some(par_gender),
                occ_first: TemplateOutcome::new(occ_first, sample.occ_gender),
                par_first: Some(TemplateOutcome::new(par_first, par_gender)),
            })
        }
        Context::OccupationObject => {
            let logits = sample
                .logits_list_obj
                .as_ref()
                .ok_or_else(|| missing("logits_list_obj"))?;
            Ok(ResolutionOutcome {
                context,
                occ_gender: sample.occ_gender,
                par_gender: None,
                occ_first: TemplateOutcome::new(logits, sample.occ_gender),
                par_first: None,
            })
        }
    }
}

/// Evaluate every sample, keyed by sample id.
pub fn analyze_samples(
    samples: &ResolutionSamples,
    context: Context,
) -> AnalysisResult<BTreeMap<String, ResolutionOutcome>> {
    let outcomes: BTreeMap<String, ResolutionOutcome> = samples
        .iter()
        .map(|(id, sample)| analyze_sample(id, sample, context).map(|o| (id.clone(), o)))
        .collect::<AnalysisResult<_>>()?;

    let neutral = outcomes.values().filter(|o| o.occ_first.neutral_check).count();
    tracing::info!(
        "Resolved {} {:?} sample(s), {} neutral on the occupation-first template",
        outcomes.len(),
        context,
        neutral
    );
    Ok(outcomes)
}
