/// N-gram model types — contexts, distributions, the rolling window, and
/// RON persistence.

use rand::distributions::{Distribution as _, WeightedIndex};
use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Padding character used to fill a context before enough real characters
/// have been seen. Corpus text must not contain it.
pub const SENTINEL: char = '~';

/// Allowed deviation of a distribution's total mass from 1.0.
const PROBABILITY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("n-gram order must be at least 1 (got {0})")]
    InvalidOrder(usize),
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),
    #[error("context {context:?} has {actual} characters, expected {expected}")]
    ContextLength {
        context: String,
        expected: usize,
        actual: usize,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("RON serialization error: {0}")]
    RonSer(#[from] ron::Error),
}

/// The `n-1` characters preceding a prediction, used as a model key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(String);

impl Context {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl Borrow<str> for Context {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Context {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Next-character probabilities for one context, most likely first.
///
/// Always non-empty, every probability finite and non-negative, total mass
/// 1.0 within tolerance. Deserialization goes through the same checks as
/// [`Distribution::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(char, f64)>", into = "Vec<(char, f64)>")]
pub struct Distribution {
    entries: Vec<(char, f64)>,
}

impl Distribution {
    /// Build a distribution from explicit `(char, probability)` pairs.
    pub fn new(entries: Vec<(char, f64)>) -> Result<Self, ModelError> {
        if entries.is_empty() {
            return Err(ModelError::InvalidDistribution(
                "distribution has no entries".to_string(),
            ));
        }

        let mut seen = FxHashSet::default();
        for &(c, p) in &entries {
            if !p.is_finite() || p < 0.0 {
                return Err(ModelError::InvalidDistribution(format!(
                    "probability for {c:?} is {p}"
                )));
            }
            if !seen.insert(c) {
                return Err(ModelError::InvalidDistribution(format!(
                    "character {c:?} listed twice"
                )));
            }
        }

        if entries.windows(2).any(|w| w[0].1 < w[1].1) {
            return Err(ModelError::InvalidDistribution(
                "entries are not sorted by descending probability".to_string(),
            ));
        }

        let total: f64 = entries.iter().map(|(_, p)| p).sum();
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ModelError::InvalidDistribution(format!(
                "probabilities sum to {total}"
            )));
        }

        Ok(Self { entries })
    }

    /// Normalize raw counts collected in discovery order.
    ///
    /// The sort is stable, so equal counts keep the order in which their
    /// characters were first seen.
    pub(crate) fn from_counts(mut counts: Vec<(char, u32)>) -> Self {
        debug_assert!(!counts.is_empty());
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let total: u64 = counts.iter().map(|&(_, n)| u64::from(n)).sum();
        let entries = counts
            .into_iter()
            .map(|(c, n)| (c, f64::from(n) / total as f64))
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[(char, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Probability of `c`, or 0.0 if it never followed this context.
    pub fn probability(&self, c: char) -> f64 {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == c)
            .map_or(0.0, |&(_, p)| p)
    }

    pub fn most_likely(&self) -> Option<char> {
        self.entries.first().map(|&(c, _)| c)
    }

    /// Draw one character, weighted by probability.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<char> {
        let dist = WeightedIndex::<f64>::new(self.entries.iter().map(|&(_, p)| p)).ok()?;
        Some(self.entries[dist.sample(rng)].0)
    }
}

impl TryFrom<Vec<(char, f64)>> for Distribution {
    type Error = ModelError;

    fn try_from(entries: Vec<(char, f64)>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<Distribution> for Vec<(char, f64)> {
    fn from(dist: Distribution) -> Self {
        dist.entries
    }
}

/// Rolling `n-1` character history, seeded with [`SENTINEL`].
///
/// For `n == 1` the window is always empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    width: usize,
    text: String,
}

impl ContextWindow {
    pub fn new(n: usize) -> Self {
        let width = n.saturating_sub(1);
        Self {
            width,
            text: std::iter::repeat(SENTINEL).take(width).collect(),
        }
    }

    /// Drop the oldest character and append `c`.
    pub fn push(&mut self, c: char) {
        if self.width == 0 {
            return;
        }
        self.text.remove(0);
        self.text.push(c);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn to_context(&self) -> Context {
        Context::new(self.text.as_str())
    }
}

/// A trained character n-gram model: context → next-character distribution.
///
/// Built by [`NgramTrainer`](crate::core::trainer::NgramTrainer) and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NgramModel {
    /// Order of the model; contexts hold `n - 1` characters.
    n: usize,
    table: FxHashMap<Context, Distribution>,
}

impl NgramModel {
    pub(crate) fn from_table(n: usize, table: FxHashMap<Context, Distribution>) -> Self {
        Self { n, table }
    }

    /// The order `n` this model was trained with.
    pub fn order(&self) -> usize {
        self.n
    }

    /// Number of characters in every context key.
    pub fn context_len(&self) -> usize {
        self.n.saturating_sub(1)
    }

    /// Number of distinct contexts.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn get(&self, context: &str) -> Option<&Distribution> {
        self.table.get(context)
    }

    pub fn contains_context(&self, context: &str) -> bool {
        self.table.contains_key(context)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Context, &Distribution)> {
        self.table.iter()
    }

    /// Total number of (context, next character) pairs.
    pub fn transition_count(&self) -> usize {
        self.table.values().map(Distribution::len).sum()
    }

    /// Check the structural invariants a deserialized model must satisfy.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n < 1 {
            return Err(ModelError::InvalidOrder(self.n));
        }
        let expected = self.context_len();
        for context in self.table.keys() {
            let actual = context.char_len();
            if actual != expected {
                return Err(ModelError::ContextLength {
                    context: context.to_string(),
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    pub fn to_ron_string(&self) -> Result<String, ModelError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn from_ron_str(source: &str) -> Result<Self, ModelError> {
        let model: NgramModel = ron::from_str(source)?;
        model.validate()?;
        Ok(model)
    }
}

/// Save an NgramModel to a RON file.
pub fn save_model(model: &NgramModel, path: &Path) -> Result<(), ModelError> {
    let serialized = model.to_ron_string()?;
    std::fs::write(path, serialized)?;
    Ok(())
}

/// Load an NgramModel from a RON file, rejecting malformed tables.
pub fn load_model(path: &Path) -> Result<NgramModel, ModelError> {
    let contents = std::fs::read_to_string(path)?;
    NgramModel::from_ron_str(&contents)
}
