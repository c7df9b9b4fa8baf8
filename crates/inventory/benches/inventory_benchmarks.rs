use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use stockroom_inventory::{Addressing, Inventory, ItemDraft, ItemId, ItemRef, Money};

fn stocked(n: usize) -> Inventory {
    let mut inv = Inventory::new(Addressing::StableId);
    for i in 0..n {
        let draft = ItemDraft::new(&format!("item-{i}"), (i as i64 % 97) + 1, Money::from_cents(
            (i as i64 % 1_000) + 1,
        ))
        .expect("valid draft");
        inv.add_item(draft).expect("add");
    }
    inv
}

fn bench_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("listing");

    for size in [10usize, 100, 1_000] {
        let inv = stocked(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("total_value", size), &inv, |b, inv| {
            b.iter(|| black_box(inv.list().total_value()));
        });

        group.bench_with_input(BenchmarkId::new("labels", size), &inv, |b, inv| {
            b.iter(|| {
                let labels: Vec<String> = inv.list().iter().map(|e| e.label()).collect();
                black_box(labels)
            });
        });
    }

    group.finish();
}

fn bench_add_remove(c: &mut Criterion) {
    c.bench_function("add_then_remove_oldest", |b| {
        let mut inv = stocked(100);
        let mut oldest = ItemId::FIRST;
        b.iter(|| {
            let draft = ItemDraft::new("churn", 1, Money::from_cents(1)).expect("valid draft");
            inv.add_item(draft).expect("add");
            inv.remove_item(ItemRef::Id(oldest)).expect("remove");
            oldest = ItemId::new(oldest.get() + 1);
        });
    });
}

criterion_group!(benches, bench_listing, bench_add_remove);
criterion_main!(benches);
