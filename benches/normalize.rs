//! Benchmarks for the name normalizer and group merge

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use annuaire::group::ContactGroup;
use annuaire::{merge_group, normalize_name, Vcard};

fn bench_normalize(c: &mut Criterion) {
    let names = [
        "Jean-Charles Hourcade",
        "Hourcade J.-C.",
        "Émile Durand",
        "Marcos Aurélio Vasconcelos de Freitas",
        "Sachs",
    ];
    c.bench_function("normalize_name", |b| {
        b.iter(|| {
            for name in &names {
                black_box(normalize_name(black_box(name)));
            }
        })
    });
}

fn bench_merge_group(c: &mut Criterion) {
    let mut cards = Vec::new();
    let mut sources = Vec::new();
    for i in 0..20 {
        let card = Vcard {
            full_name: Some("Jean Dupont".into()),
            emails: vec![format!("jean{i}@x.fr"), "shared@x.fr".into()],
            organizations: vec!["CIRED".into()],
            notes: vec![format!("note {i}")],
            ..Default::default()
        };
        cards.push(card);
        sources.push(format!("source{i}.vcf"));
    }
    let group = ContactGroup { cards, sources };
    c.bench_function("merge_group_20_cards", |b| {
        b.iter(|| black_box(merge_group(black_box(&group))))
    });
}

criterion_group!(benches, bench_normalize, bench_merge_group);
criterion_main!(benches);
