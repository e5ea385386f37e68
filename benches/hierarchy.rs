use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hiers::{canonicalize, from_smiles, IdentifierScheme, ScaffoldEngine};

const CAFFEINE: &str = "Cn1cnc2c1c(=O)n(C)c(=O)n2C";
const ATORVASTATIN: &str =
    "CC(C)c1c(C(=O)Nc2ccccc2)c(-c2ccccc2)c(-c2ccc(F)cc2)n1CC[C@@H](O)C[C@@H](O)CC(=O)O";
const SUNITINIB: &str = r"CCN(CC)CCNC(=O)c1c(C)[nH]c(/C=C2\C(=O)Nc3ccc(F)cc32)c1C";
const ENZASTAURIN: &str =
    "Cn1cc(C2=C(c3cn(C4CCN(Cc5ccccn5)CC4)c4ccccc34)C(=O)NC2=O)c2ccccc21";

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("caffeine", |b| {
        b.iter(|| black_box(from_smiles(black_box(CAFFEINE)).unwrap()))
    });
    group.bench_function("atorvastatin", |b| {
        b.iter(|| black_box(from_smiles(black_box(ATORVASTATIN)).unwrap()))
    });

    group.finish();
}

fn bench_identifiers(c: &mut Criterion) {
    let atorvastatin = from_smiles(ATORVASTATIN).unwrap();

    let mut group = c.benchmark_group("identifier");

    for scheme in [
        IdentifierScheme::CanonicalSmiles,
        IdentifierScheme::KekuleSmiles,
        IdentifierScheme::StructureHash,
    ] {
        group.bench_function(scheme.name(), |b| {
            b.iter(|| black_box(canonicalize(black_box(&atorvastatin), scheme)))
        });
    }

    group.finish();
}

fn bench_scaffolds(c: &mut Criterion) {
    let engine = ScaffoldEngine::default();

    let mut group = c.benchmark_group("scaffolds");

    group.bench_function("sunitinib", |b| {
        b.iter(|| black_box(engine.get_scaffolds(black_box(SUNITINIB), "", 10)))
    });
    group.bench_function("enzastaurin", |b| {
        b.iter(|| black_box(engine.get_scaffolds(black_box(ENZASTAURIN), "", 10)))
    });
    group.bench_function("batch", |b| {
        let inputs = [
            (CAFFEINE, ""),
            (ATORVASTATIN, ""),
            (SUNITINIB, ""),
            (ENZASTAURIN, ""),
        ];
        b.iter(|| black_box(engine.get_scaffolds_batch(black_box(&inputs), 10)))
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_identifiers, bench_scaffolds);
criterion_main!(benches);
