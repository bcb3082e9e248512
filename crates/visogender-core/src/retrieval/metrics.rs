//! Per-occupation retrieval metrics and their flat JSON representation.
//!
//! On the wire every rank cutoff contributes five keys (`skew@k`, `maxskew@k`,
//! `minskew@k`, `bias@k`, `bias_count@k`) next to a single `ndkl` key:
//!
//! ```json
//! {"skew@1": {"feminine": -0.69, "masculine": 0.41}, "maxskew@1": 0.41, ..., "ndkl": 0.12}
//! ```

use serde::de::{Deserializer, Error as _};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;
use crate::types::GenderLabel;

/// Metrics for the top-`k` prefix of one occupation's ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankMetrics {
    /// Prefix length (1-based)
    pub k: usize,

    /// Log-ratio of actual to expected share, per label present in the candidates
    pub skew: BTreeMap<GenderLabel, f64>,

    pub max_skew: f64,

    pub min_skew: f64,

    /// Normalized difference between the two grouping categories, in `[-1, 1]`
    pub bias: f64,

    /// Mean positional weight of the top-`k` candidates
    pub bias_count: f64,
}

impl RankMetrics {
    /// Build the metrics for one cutoff, deriving max/min skew from `skew`.
    pub fn new(k: usize, skew: BTreeMap<GenderLabel, f64>, bias: f64, bias_count: f64) -> Self {
        let max_skew = skew.values().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_skew = skew.values().copied().fold(f64::INFINITY, f64::min);
        Self {
            k,
            skew,
            max_skew,
            min_skew,
            bias,
            bias_count,
        }
    }
}

/// All metrics for one occupation: one [`RankMetrics`] per cutoff plus NDKL.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalMetrics {
    ranks: Vec<RankMetrics>,
    ndkl: f64,
}

impl RetrievalMetrics {
    /// Assemble metrics from cutoffs ordered `k = 1..=n`.
    pub fn new(ranks: Vec<RankMetrics>, ndkl: f64) -> Self {
        debug_assert!(ranks.iter().enumerate().all(|(i, r)| r.k == i + 1));
        Self { ranks, ndkl }
    }

    /// Number of ranked candidates.
    pub fn candidate_count(&self) -> usize {
        self.ranks.len()
    }

    /// Metrics at cutoff `k` (1-based).
    pub fn at(&self, k: usize) -> Option<&RankMetrics> {
        k.checked_sub(1).and_then(|i| self.ranks.get(i))
    }

    pub fn ranks(&self) -> &[RankMetrics] {
        &self.ranks
    }

    /// Normalized discounted cumulative KL divergence over all cutoffs.
    pub fn ndkl(&self) -> f64 {
        self.ndkl
    }

    /// Look up a scalar metric; `None` when `k` exceeds the candidate count.
    pub fn scalar(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Ndkl => Some(self.ndkl),
            Metric::Bias(k) => self.at(k).map(|r| r.bias),
            Metric::BiasCount(k) => self.at(k).map(|r| r.bias_count),
            Metric::MaxSkew(k) => self.at(k).map(|r| r.max_skew),
            Metric::MinSkew(k) => self.at(k).map(|r| r.min_skew),
        }
    }
}

/// A scalar retrieval metric addressed by name, e.g. `bias@5` or `ndkl`.
///
/// Names are case-insensitive, so `NDKL` and `MaxSkew@10` parse too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Bias(usize),
    BiasCount(usize),
    MaxSkew(usize),
    MinSkew(usize),
    Ndkl,
}

impl FromStr for Metric {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower == "ndkl" {
            return Ok(Metric::Ndkl);
        }
        let unknown = || AnalysisError::UnknownMetric(s.to_string());
        let (name, k) = lower.split_once('@').ok_or_else(unknown)?;
        let k: usize = k.parse().map_err(|_| unknown())?;
        if k == 0 {
            return Err(unknown());
        }
        match name {
            "bias" => Ok(Metric::Bias(k)),
            "bias_count" => Ok(Metric::BiasCount(k)),
            "maxskew" => Ok(Metric::MaxSkew(k)),
            "minskew" => Ok(Metric::MinSkew(k)),
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Bias(k) => write!(f, "bias@{k}"),
            Metric::BiasCount(k) => write!(f, "bias_count@{k}"),
            Metric::MaxSkew(k) => write!(f, "maxskew@{k}"),
            Metric::MinSkew(k) => write!(f, "minskew@{k}"),
            Metric::Ndkl => f.write_str("ndkl"),
        }
    }
}

// ── Flat JSON encoding ─────────────────────────────────────────────────────

impl Serialize for RetrievalMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.ranks.len() * 5 + 1))?;
        for rank in &self.ranks {
            let k = rank.k;
            map.serialize_entry(&format!("skew@{k}"), &rank.skew)?;
            map.serialize_entry(&format!("maxskew@{k}"), &rank.max_skew)?;
            map.serialize_entry(&format!("minskew@{k}"), &rank.min_skew)?;
            map.serialize_entry(&format!("bias@{k}"), &rank.bias)?;
            map.serialize_entry(&format!("bias_count@{k}"), &rank.bias_count)?;
        }
        map.serialize_entry("ndkl", &self.ndkl)?;
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlatValue {
    Scalar(f64),
    Skew(BTreeMap<GenderLabel, f64>),
}

#[derive(Default)]
struct PartialRank {
    skew: Option<BTreeMap<GenderLabel, f64>>,
    max_skew: Option<f64>,
    min_skew: Option<f64>,
    bias: Option<f64>,
    bias_count: Option<f64>,
}

impl<'de> Deserialize<'de> for RetrievalMetrics {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let flat: BTreeMap<String, FlatValue> = BTreeMap::deserialize(deserializer)?;

        let mut ndkl = None;
        let mut partial: BTreeMap<usize, PartialRank> = BTreeMap::new();

        for (key, value) in flat {
            if key == "ndkl" {
                match value {
                    FlatValue::Scalar(v) => ndkl = Some(v),
                    FlatValue::Skew(_) => return Err(D::Error::custom("ndkl must be a number")),
                }
                continue;
            }

            let (name, k) = key
                .split_once('@')
                .ok_or_else(|| D::Error::custom(format!("unexpected key `{key}`")))?;
            let k: usize = k
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid cutoff in `{key}`")))?;
            let entry = partial.entry(k).or_default();

            match (name, value) {
                ("skew", FlatValue::Skew(m)) => entry.skew = Some(m),
                ("maxskew", FlatValue::Scalar(v)) => entry.max_skew = Some(v),
                ("minskew", FlatValue::Scalar(v)) => entry.min_skew = Some(v),
                ("bias", FlatValue::Scalar(v)) => entry.bias = Some(v),
                ("bias_count", FlatValue::Scalar(v)) => entry.bias_count = Some(v),
                _ => return Err(D::Error::custom(format!("unexpected value for `{key}`"))),
            }
        }

        let ndkl = ndkl.ok_or_else(|| D::Error::missing_field("ndkl"))?;

        let mut ranks = Vec::with_capacity(partial.len());
        for (i, (k, p)) in partial.into_iter().enumerate() {
            if k != i + 1 {
                return Err(D::Error::custom(format!("missing metrics for k = {}", i + 1)));
            }
            let missing = |field: &str| D::Error::custom(format!("missing `{field}@{k}`"));
            ranks.push(RankMetrics {
                k,
                skew: p.skew.ok_or_else(|| missing("skew"))?,
                max_skew: p.max_skew.ok_or_else(|| missing("maxskew"))?,
                min_skew: p.min_skew.ok_or_else(|| missing("minskew"))?,
                bias: p.bias.ok_or_else(|| missing("bias"))?,
                bias_count: p.bias_count.ok_or_else(|| missing("bias_count"))?,
            });
        }

        Ok(RetrievalMetrics { ranks, ndkl })
    }
}
