pub mod generator;
pub mod model;
pub mod trainer;

pub use generator::{generate, sample_next, Generator};
pub use model::{
    load_model, save_model, Context, ContextWindow, Distribution, ModelError, NgramModel,
    SENTINEL,
};
pub use trainer::NgramTrainer;
