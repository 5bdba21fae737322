use criterion::{criterion_group, criterion_main, Criterion};
use lineage_core::lineage::{resolve, AxisIndex};
use lineage_core::Lineage;
use nalgebra::DMatrix;

fn bench_indexing(c: &mut Criterion) {
    let names: Vec<String> = (0..12).map(|i| format!("lineage_{}", i)).collect();
    let x = DMatrix::new_random(10_000, 12);
    let l = Lineage::new(x.clone(), names.clone(), None).unwrap();
    let mask: Vec<bool> = (0..10_000).map(|i| i % 3 == 0).collect();

    c.bench_function("create_10000x12", |b| {
        b.iter(|| Lineage::new(x.clone(), names.clone(), None).unwrap())
    });

    c.bench_function("resolve_mask_10000", |b| {
        let idx = AxisIndex::Mask(mask.clone());
        b.iter(|| resolve(&idx, 10_000, None).unwrap())
    });

    c.bench_function("subset_mask_x_names", |b| {
        b.iter(|| {
            l.subset(mask.clone(), vec!["lineage_7", "lineage_2", "lineage_11"])
                .unwrap()
        })
    });

    c.bench_function("get_reorder_all_columns", |b| {
        let reversed: Vec<String> = names.iter().rev().cloned().collect();
        b.iter(|| l.get(reversed.clone()).unwrap())
    });
}

criterion_group!(benches, bench_indexing);
criterion_main!(benches);
