/// Text generation — walks a trained model, sampling one character at a time.

use rand::Rng;

use crate::core::model::{ContextWindow, NgramModel, SENTINEL};

/// Sample the character that follows `context`.
///
/// Returns [`SENTINEL`] without touching `rng` when the model has never
/// seen `context`.
pub fn sample_next<R: Rng + ?Sized>(model: &NgramModel, context: &str, rng: &mut R) -> char {
    match model.get(context) {
        Some(dist) => dist.sample(rng).unwrap_or(SENTINEL),
        None => SENTINEL,
    }
}

/// Generate exactly `length` characters from `model`.
///
/// `n` must be the order the model was trained with; it is not checked.
/// The sentinel padding that seeds the context is not part of the output.
pub fn generate<R: Rng + ?Sized>(
    model: &NgramModel,
    n: usize,
    length: usize,
    rng: &mut R,
) -> String {
    let mut window = ContextWindow::new(n);
    let mut output = String::with_capacity(length);

    for _ in 0..length {
        let next = sample_next(model, window.as_str(), rng);
        output.push(next);
        window.push(next);
    }

    output
}

/// A model paired with the order used to walk it.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'m> {
    model: &'m NgramModel,
    n: usize,
}

impl<'m> Generator<'m> {
    pub fn new(model: &'m NgramModel, n: usize) -> Self {
        Self { model, n }
    }

    /// Use the order recorded in the model itself.
    pub fn for_model(model: &'m NgramModel) -> Self {
        Self::new(model, model.order())
    }

    pub fn sample_next<R: Rng + ?Sized>(&self, context: &str, rng: &mut R) -> char {
        sample_next(self.model, context, rng)
    }

    pub fn generate<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> String {
        generate(self.model, self.n, length, rng)
    }

    /// Generate `count` independent passages of `length` characters each.
    pub fn generate_passages<R: Rng + ?Sized>(
        &self,
        count: usize,
        length: usize,
        rng: &mut R,
    ) -> Vec<String> {
        (0..count).map(|_| self.generate(length, rng)).collect()
    }
}

impl NgramModel {
    /// Generate `length` characters using this model's own order.
    pub fn generate<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> String {
        Generator::for_model(self).generate(length, rng)
    }
}
