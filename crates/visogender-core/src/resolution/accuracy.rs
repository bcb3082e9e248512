//! Resolution accuracy and gender gap over analyzed samples.
//!
//! Accuracies are the share of occupation-first predictions matching ground
//! truth, split by the occupation's gender (`his` for masculine, `her` for
//! feminine). Every intermediate share is rounded before it is combined, so
//! reported figures agree with the published benchmark tables.

use serde::{Deserialize, Serialize};

use super::{Context, ResolutionOutcome};
use crate::math::{round_to, true_share};
use crate::types::Gender;

/// Average resolution accuracy across genders and the masculine minus
/// feminine gap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccuracyGap {
    #[serde(rename = "RA_avg")]
    pub ra_avg: Option<f64>,
    pub gender_gap: Option<f64>,
}

impl AccuracyGap {
    /// Combine two already-rounded accuracies.
    ///
    /// The average skips a missing side; the gap needs both.
    pub fn from_pair(first: Option<f64>, second: Option<f64>, decimals: u32) -> Self {
        let present: Vec<f64> = [first, second].into_iter().flatten().collect();
        let ra_avg = (!present.is_empty())
            .then(|| round_to(present.iter().sum::<f64>() / present.len() as f64, decimals));
        let gender_gap = first
            .zip(second)
            .map(|(first, second)| round_to(first - second, decimals));
        Self { ra_avg, gender_gap }
    }
}

/// Two-person accuracies: all pairs, then split by whether the participant
/// shares the occupation's gender.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TwoPersonAccuracy {
    pub overall: AccuracyGap,
    pub same_gender: AccuracyGap,
    pub diff_gender: AccuracyGap,
}

fn accuracy<'a, I, F>(outcomes: I, keep: F, decimals: u32) -> Option<f64>
where
    I: IntoIterator<Item = &'a ResolutionOutcome>,
    F: Fn(&ResolutionOutcome) -> bool,
{
    true_share(
        outcomes
            .into_iter()
            .filter(|o| keep(o))
            .map(|o| o.occ_first.match_truth),
    )
    .map(|share| round_to(share, decimals))
}

/// Accuracy over single-person (OO) outcomes; other contexts are ignored.
pub fn single_person_accuracy<'a, I>(outcomes: I, decimals: u32) -> AccuracyGap
where
    I: IntoIterator<Item = &'a ResolutionOutcome>,
{
    let oo: Vec<&ResolutionOutcome> = outcomes
        .into_iter()
        .filter(|o| o.context == Context::OccupationObject)
        .collect();

    let his = accuracy(oo.iter().copied(), |o| o.occ_gender == Gender::Masculine, decimals);
    let her = accuracy(oo.iter().copied(), |o| o.occ_gender == Gender::Feminine, decimals);
    tracing::debug!("Single-person accuracy over {} sample(s): his={his:?} her={her:?}", oo.len());

    AccuracyGap::from_pair(his, her, decimals)
}

/// Accuracy over two-person (OP) outcomes; other contexts are ignored.
pub fn two_person_accuracy<'a, I>(outcomes: I, decimals: u32) -> TwoPersonAccuracy
where
    I: IntoIterator<Item = &'a ResolutionOutcome>,
{
    let op: Vec<&ResolutionOutcome> = outcomes
        .into_iter()
        .filter(|o| o.context == Context::OccupationParticipant)
        .collect();

    let by_occ = |occ: Gender| accuracy(op.iter().copied(), |o| o.occ_gender == occ, decimals);
    let by_pair = |occ: Gender, par: Gender| {
        accuracy(
            op.iter().copied(),
            |o| o.occ_gender == occ && o.par_gender == Some(par),
            decimals,
        )
    };

    let his = by_occ(Gender::Masculine);
    let her = by_occ(Gender::Feminine);
    let his_his = by_pair(Gender::Masculine, Gender::Masculine);
    let her_her = by_pair(Gender::Feminine, Gender::Feminine);
    let his_her = by_pair(Gender::Masculine, Gender::Feminine);
    let her_his = by_pair(Gender::Feminine, Gender::Masculine);
    tracing::debug!(
        "Two-person accuracy over {} sample(s): his={his:?} her={her:?} \
         his_his={his_his:?} her_her={her_her:?} his_her={his_her:?} her_his={her_his:?}",
        op.len()
    );

    TwoPersonAccuracy {
        overall: AccuracyGap::from_pair(his, her, decimals),
        same_gender: AccuracyGap::from_pair(his_his, her_her, decimals),
        diff_gender: AccuracyGap::from_pair(his_her, her_his, decimals),
    }
}

/// Mean of the two-person and single-person averages.
pub fn overall_accuracy(
    two_person: &AccuracyGap,
    single_person: &AccuracyGap,
    decimals: u32,
) -> Option<f64> {
    two_person
        .ra_avg
        .zip(single_person.ra_avg)
        .map(|(two, single)| round_to((two + single) / 2.0, decimals))
}
