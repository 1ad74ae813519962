/// N-gram training — counts next characters per context and normalizes.

use rustc_hash::FxHashMap;

use crate::core::model::{Context, ContextWindow, Distribution, ModelError, NgramModel};

/// Trains character n-gram models from a flat character sequence.
pub struct NgramTrainer;

impl NgramTrainer {
    /// Train an order-`n` model from `text`.
    ///
    /// Contexts at the start of the text are left-padded with
    /// [`SENTINEL`](crate::core::model::SENTINEL). For `n == 1` every
    /// character is counted under the empty context, giving a single
    /// unigram distribution. An empty `text` yields an empty model.
    pub fn train(text: &str, n: usize) -> Result<NgramModel, ModelError> {
        if n < 1 {
            return Err(ModelError::InvalidOrder(n));
        }

        let mut counts: FxHashMap<Context, Vec<(char, u32)>> = FxHashMap::default();
        let mut window = ContextWindow::new(n);
        let mut seen = 0usize;

        for c in text.chars() {
            if let Some(entries) = counts.get_mut(window.as_str()) {
                add_transition(entries, c);
            } else {
                counts.insert(window.to_context(), vec![(c, 1)]);
            }
            window.push(c);
            seen += 1;
        }

        let table: FxHashMap<Context, Distribution> = counts
            .into_iter()
            .map(|(context, entries)| (context, Distribution::from_counts(entries)))
            .collect();
        let model = NgramModel::from_table(n, table);

        tracing::debug!(
            order = n,
            chars = seen,
            contexts = model.len(),
            transitions = model.transition_count(),
            "trained n-gram model"
        );

        Ok(model)
    }
}

/// Increment the count for `next`, appending it if this is its first sighting.
fn add_transition(entries: &mut Vec<(char, u32)>, next: char) {
    if let Some(entry) = entries.iter_mut().find(|(c, _)| *c == next) {
        entry.1 += 1;
    } else {
        entries.push((next, 1));
    }
}
