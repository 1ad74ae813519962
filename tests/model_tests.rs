/// Model integration tests — training invariants, generation, persistence.

use char_ngram::core::{
    generate, load_model, sample_next, save_model, Generator, NgramModel, NgramTrainer, SENTINEL,
};
use char_ngram::corpus::CorpusBuilder;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn fixture_corpus() -> String {
    std::fs::read_to_string("tests/fixtures/test_corpus.txt").unwrap()
}

fn normalized_fixture() -> String {
    CorpusBuilder::new().add_text(&fixture_corpus()).build()
}

#[test]
fn every_distribution_sums_to_one() {
    let corpus = fixture_corpus();
    for n in 1..=5 {
        let model = NgramTrainer::train(&corpus, n).unwrap();
        assert!(!model.is_empty());
        for (context, dist) in model.iter() {
            let total: f64 = dist.entries().iter().map(|(_, p)| p).sum();
            assert!(
                (total - 1.0).abs() < 1e-9,
                "context {context:?} (n={n}) sums to {total}"
            );
            assert_eq!(context.char_len(), n - 1);
        }
    }
}

#[test]
fn distributions_are_sorted_descending() {
    let model = NgramTrainer::train(&fixture_corpus(), 2).unwrap();
    for (_, dist) in model.iter() {
        assert!(dist.entries().windows(2).all(|w| w[0].1 >= w[1].1));
    }
}

#[test]
fn training_is_deterministic() {
    let corpus = fixture_corpus();
    let a = NgramTrainer::train(&corpus, 4).unwrap();
    let b = NgramTrainer::train(&corpus, 4).unwrap();
    assert_eq!(a, b);
}

#[test]
fn probabilities_match_empirical_counts() {
    // after "th": "the" x4, "thi" x1
    let model = NgramTrainer::train("the then there this theme", 3).unwrap();
    let dist = model.get("th").unwrap();
    assert_eq!(dist.probability('e'), 0.8);
    assert_eq!(dist.probability('i'), 0.2);
    assert_eq!(dist.len(), 2);
}

#[test]
fn cacao_table_is_exact() {
    let model = NgramTrainer::train("cacao", 3).unwrap();
    let mut entries: Vec<(String, Vec<(char, f64)>)> = model
        .iter()
        .map(|(ctx, dist)| (ctx.to_string(), dist.entries().to_vec()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        entries,
        vec![
            ("ac".to_string(), vec![('a', 1.0)]),
            ("ca".to_string(), vec![('c', 0.5), ('o', 0.5)]),
            ("~c".to_string(), vec![('a', 1.0)]),
            ("~~".to_string(), vec![('c', 1.0)]),
        ]
    );
}

#[test]
fn repeated_char_generates_only_that_char() {
    let model = NgramTrainer::train("aaaa", 2).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    for length in [1, 10, 250] {
        let text = generate(&model, 2, length, &mut rng);
        assert_eq!(text.chars().count(), length);
        assert!(text.chars().all(|c| c == 'a'), "unexpected output: {text}");
    }
}

#[test]
fn unseen_context_always_returns_sentinel() {
    let model = NgramTrainer::train(&fixture_corpus(), 3).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    for context in ["zq", "##", "~z", "xx"] {
        assert!(!model.contains_context(context));
        for _ in 0..50 {
            assert_eq!(sample_next(&model, context, &mut rng), SENTINEL);
        }
    }
}

#[test]
fn output_length_matches_request() {
    let corpus = fixture_corpus();
    for n in [1, 2, 3, 6] {
        let model = NgramTrainer::train(&corpus, n).unwrap();
        let mut rng = StdRng::seed_from_u64(n as u64);
        for length in [0, 1, 100] {
            assert_eq!(generate(&model, n, length, &mut rng).chars().count(), length);
        }
    }
}

#[test]
fn empty_corpus_generates_sentinels() {
    let model = NgramTrainer::train("", 3).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(generate(&model, 3, 0, &mut rng), "");
    assert_eq!(generate(&model, 3, 1, &mut rng), "~");
    let long = generate(&model, 3, 100, &mut rng);
    assert_eq!(long.chars().count(), 100);
    assert!(long.chars().all(|c| c == SENTINEL));
}

#[test]
fn weighted_sampling_follows_probabilities() {
    // context "a" is followed by x nine times and y once
    let corpus = "ax".repeat(9) + "ay";
    let model = NgramTrainer::train(&corpus, 2).unwrap();
    let dist = model.get("a").unwrap();
    assert_eq!(dist.entries(), &[('x', 0.9), ('y', 0.1)]);

    let mut rng = StdRng::seed_from_u64(2024);
    let draws = 20_000;
    let mut x_count = 0;
    for _ in 0..draws {
        match sample_next(&model, "a", &mut rng) {
            'x' => x_count += 1,
            'y' => {}
            other => panic!("unexpected sample {other:?}"),
        }
    }
    let freq = x_count as f64 / draws as f64;
    assert!((0.88..=0.92).contains(&freq), "x frequency {freq}");
}

#[test]
fn generated_text_only_uses_corpus_chars() {
    let corpus = fixture_corpus();
    let model = NgramTrainer::train(&corpus, 3).unwrap();
    let mut rng = StdRng::seed_from_u64(77);
    let text = Generator::for_model(&model).generate(500, &mut rng);
    for c in text.chars() {
        assert!(c == SENTINEL || corpus.contains(c), "char {c:?} not in corpus");
    }
}

#[test]
fn same_seed_same_text() {
    let model = NgramTrainer::train(&fixture_corpus(), 4).unwrap();
    let mut rng1 = StdRng::seed_from_u64(99);
    let mut rng2 = StdRng::seed_from_u64(99);
    assert_eq!(model.generate(300, &mut rng1), model.generate(300, &mut rng2));
}

#[test]
fn ron_round_trip_preserves_model_and_output() {
    let model = NgramTrainer::train(&normalized_fixture(), 3).unwrap();
    let serialized = model.to_ron_string().unwrap();
    let restored = NgramModel::from_ron_str(&serialized).unwrap();
    assert_eq!(restored, model);

    let mut rng1 = StdRng::seed_from_u64(5);
    let mut rng2 = StdRng::seed_from_u64(5);
    assert_eq!(model.generate(200, &mut rng1), restored.generate(200, &mut rng2));
}

#[test]
fn save_and_load_model() {
    let model = NgramTrainer::train(&normalized_fixture(), 2).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.ron");

    save_model(&model, &path).unwrap();
    let loaded = load_model(&path).unwrap();

    assert_eq!(loaded.order(), 2);
    assert_eq!(loaded, model);
}

#[test]
fn load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_model(&dir.path().join("nope.ron")).is_err());
}
