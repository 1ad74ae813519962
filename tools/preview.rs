/// Preview — load a saved n-gram model and print generated passages.
///
/// Usage: preview --model <model.ron> [--length <n>] [--count <n>] [--seed <n>]
use anyhow::{Context, Result};
use char_ngram::core::{load_model, Generator};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "preview", about = "Generate text from a saved character n-gram model.")]
struct Args {
    /// Model file written by corpus_trainer
    #[arg(long, short = 'm')]
    model: PathBuf,

    /// Characters per passage
    #[arg(long, default_value_t = 200)]
    length: usize,

    /// Number of passages
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// RNG seed; omit for OS entropy
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("char_ngram=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let model = load_model(&args.model)
        .with_context(|| format!("loading model '{}'", args.model.display()))?;
    tracing::info!(
        order = model.order(),
        contexts = model.len(),
        "model loaded"
    );

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let passages = Generator::for_model(&model).generate_passages(args.count, args.length, &mut rng);
    for (i, passage) in passages.iter().enumerate() {
        if args.count > 1 {
            println!("--- {} ---", i + 1);
        }
        println!("{passage}");
    }

    Ok(())
}
