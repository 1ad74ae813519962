//! char-ngram — character-level n-gram language model.
//!
//! Trains per-context next-character distributions from a flat character
//! sequence and samples new text from them. Corpus preparation lives in
//! [`corpus`]; the model itself lives in [`core`].

pub mod config;
pub mod core;
pub mod corpus;
