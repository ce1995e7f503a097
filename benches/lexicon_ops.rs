//! Benchmarks for lexicon and grammar operations.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use wikilex::config::EngineConfig;
use wikilex::engine::Engine;
use wikilex::word;

fn populated_engine(concepts: usize) -> Engine {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    for i in 0..concepts {
        let mut el = engine.create_ontology_element("noun").unwrap();
        engine
            .save_words(&mut el, 0, &[format!("thing{i}").into(), format!("things{i}").into()])
            .unwrap();
    }
    for name in ["Mary", "John"] {
        let mut el = engine.create_ontology_element("propername").unwrap();
        engine.save_words(&mut el, 0, &[name.into(), false.into()]).unwrap();
    }
    engine
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_multiword", |bench| {
        bench.iter(|| black_box(word::normalize(black_box("  located__in   the  "))))
    });
}

fn bench_save(c: &mut Criterion) {
    let engine = populated_engine(1_000);
    let mut counter = 0u64;

    c.bench_function("save_noun_1k_lexicon", |bench| {
        bench.iter_batched(
            || {
                counter += 1;
                (
                    engine.create_ontology_element("noun").unwrap(),
                    format!("fresh{counter}"),
                )
            },
            |(mut el, w)| {
                engine
                    .save_words(&mut el, 0, &[w.as_str().into(), format!("{w}s").into()])
                    .unwrap()
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_parse(c: &mut Criterion) {
    let engine = populated_engine(1_000);
    // Warm the lexical index.
    engine.parse("en", "Mary is a thing1.").unwrap();

    c.bench_function("parse_instance_1k_lexicon", |bench| {
        bench.iter(|| black_box(engine.parse("en", black_box("Mary is a thing500.")).unwrap()))
    });
}

fn bench_consistency(c: &mut Criterion) {
    let engine = populated_engine(200);
    for i in 1..200 {
        let sentence = engine
            .parse("en", &format!("Every thing{i} is a thing{}.", i - 1))
            .unwrap();
        engine.add_sentence(sentence).unwrap();
    }

    c.bench_function("check_chain_200", |bench| {
        bench.iter(|| black_box(engine.check_consistency().unwrap()))
    });
}

criterion_group!(benches, bench_normalize, bench_save, bench_parse, bench_consistency);
criterion_main!(benches);
