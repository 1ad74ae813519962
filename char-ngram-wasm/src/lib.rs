//! WASM bindings for char-ngram — powers the in-browser playground.

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use char_ngram::core::{Generator, ModelError, NgramModel, NgramTrainer};
use char_ngram::corpus::CorpusBuilder;

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct ModelInfo {
    order: usize,
    contexts: usize,
    transitions: usize,
    corpus_chars: usize,
}

// ---------------------------------------------------------------------------
// NgramDemo — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct NgramDemo {
    model: NgramModel,
    rng: StdRng,
    corpus_chars: usize,
}

#[wasm_bindgen]
impl NgramDemo {
    /// Normalize `corpus` and train an order-`n` model on it.
    #[wasm_bindgen(constructor)]
    pub fn new(corpus: &str, n: usize, seed: u64) -> Result<NgramDemo, JsError> {
        Self::train(corpus, n, seed).map_err(|e| JsError::new(&format!("Training error: {e}")))
    }

    /// Generate `length` characters, advancing the demo's RNG.
    pub fn generate(&mut self, length: usize) -> String {
        Generator::for_model(&self.model).generate(length, &mut self.rng)
    }

    /// Generate several passages. Returns a JSON array of strings.
    pub fn generate_passages(&mut self, count: usize, length: usize) -> Result<String, JsError> {
        self.passages_json(count, length)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return a JSON summary of the trained model.
    pub fn model_info(&self) -> Result<String, JsError> {
        self.info_json()
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return the trained model as RON text.
    pub fn export_ron(&self) -> Result<String, JsError> {
        self.model
            .to_ron_string()
            .map_err(|e| JsError::new(&format!("Export error: {e}")))
    }

    /// Restart sampling from a new seed (same model).
    pub fn reset(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

// Private helpers
impl NgramDemo {
    fn train(corpus: &str, n: usize, seed: u64) -> Result<NgramDemo, ModelError> {
        let text = CorpusBuilder::new().add_text(corpus).build();
        let model = NgramTrainer::train(&text, n)?;

        Ok(NgramDemo {
            model,
            rng: StdRng::seed_from_u64(seed),
            corpus_chars: text.chars().count(),
        })
    }

    fn passages_json(&mut self, count: usize, length: usize) -> serde_json::Result<String> {
        let passages =
            Generator::for_model(&self.model).generate_passages(count, length, &mut self.rng);
        serde_json::to_string(&passages)
    }

    fn info_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&ModelInfo {
            order: self.model.order(),
            contexts: self.model.len(),
            transitions: self.model.transition_count(),
            corpus_chars: self.corpus_chars,
        })
    }
}
