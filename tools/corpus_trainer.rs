/// Corpus Trainer — builds a corpus, trains an n-gram model, saves it as RON.
///
/// Usage: corpus_trainer --input <file|dir>... --output <model.ron> --ngram <n>
use anyhow::{Context, Result};
use char_ngram::config::NgramConfig;
use char_ngram::core::{save_model, Generator, NgramTrainer};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "corpus_trainer",
    about = "Train a character n-gram model from text files and save it as RON."
)]
struct Args {
    /// RON config file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Corpus file or directory (repeatable)
    #[arg(long = "input", short = 'i')]
    inputs: Vec<PathBuf>,

    /// Extension of files picked up from directories
    #[arg(long)]
    extension: Option<String>,

    /// N-gram order
    #[arg(long)]
    ngram: Option<usize>,

    /// Where to write the trained model
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Print a sample of this many characters after training
    #[arg(long)]
    generate: Option<usize>,

    /// RNG seed for the sample
    #[arg(long)]
    seed: Option<u64>,

    /// Keep original letter case
    #[arg(long)]
    keep_case: bool,

    /// Keep ASCII punctuation
    #[arg(long)]
    keep_punctuation: bool,
}

impl Args {
    fn into_config(self) -> Result<(NgramConfig, Option<PathBuf>, Option<usize>)> {
        let mut config = match &self.config {
            Some(path) => NgramConfig::load_from_ron(path)
                .with_context(|| format!("loading config '{}'", path.display()))?,
            None => NgramConfig::default(),
        };

        config.sources.extend(self.inputs);
        if let Some(ext) = self.extension {
            config.extension = ext;
        }
        if let Some(n) = self.ngram {
            config.order = n;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.keep_case {
            config.normalize.lowercase = false;
        }
        if self.keep_punctuation {
            config.normalize.strip_punctuation = false;
        }
        config.validate()?;

        Ok((config, self.output, self.generate))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("char_ngram=info".parse()?),
        )
        .init();

    let (config, output, sample_len) = Args::parse().into_config()?;
    if config.sources.is_empty() {
        anyhow::bail!("no corpus given: pass --input or list sources in --config");
    }

    let start = Instant::now();
    let builder = config.corpus_builder()?;
    let corpus = builder.build();
    tracing::info!(
        sources = builder.source_count(),
        chars = corpus.chars().count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "corpus built"
    );

    let start = Instant::now();
    let model = NgramTrainer::train(&corpus, config.order)?;
    tracing::info!(
        order = model.order(),
        contexts = model.len(),
        transitions = model.transition_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "model trained"
    );

    if let Some(path) = &output {
        save_model(&model, path)
            .with_context(|| format!("saving model to '{}'", path.display()))?;
        tracing::info!(path = %path.display(), "model saved");
    }

    if let Some(length) = sample_len {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let start = Instant::now();
        let text = Generator::for_model(&model).generate(length, &mut rng);
        tracing::info!(
            chars = length,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "sample generated"
        );
        println!("{text}");
    }

    Ok(())
}
