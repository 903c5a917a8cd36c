use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use nbldpc_decoder::cnp::bubble::elementary_step;
use nbldpc_decoder::cnp::syndrome::{SyndromeCnpConfig, SyndromeCnp};
use nbldpc_decoder::cnp::CheckNodeProcessor;
use nbldpc_decoder::gf::GfTables;
use nbldpc_decoder::message::GfList;
use std::hint::black_box;

fn sample_list(nm: usize, seed: u16) -> GfList {
    let mut llr = Vec::with_capacity(nm);
    let mut gf = Vec::with_capacity(nm);
    for i in 0..nm {
        llr.push(i as f32 * 0.75);
        gf.push((seed.wrapping_add(i as u16 * 7)) % 64);
    }
    GfList { llr, gf }
}

pub fn group_bubble(c: &mut Criterion) {
    let tables = GfTables::build(64).unwrap();
    c.bench_function("elementary_step", |b| {
        b.iter_batched_ref(
            || (sample_list(16, 1), sample_list(16, 13)),
            |(u, v)| black_box(elementary_step(&tables, u, v, 64)),
            BatchSize::SmallInput,
        )
    });
}

pub fn group_syndrome(c: &mut Criterion) {
    let tables = GfTables::build(64).unwrap();
    c.bench_function("syndrome_process_row_dc4", |b| {
        let cfg = SyndromeCnpConfig {
            d1: 4,
            d2: 4,
            d3: 4,
            ..SyndromeCnpConfig::default()
        };
        b.iter_batched_ref(
            || {
                vec![
                    sample_list(8, 1),
                    sample_list(8, 5),
                    sample_list(8, 9),
                    sample_list(8, 13),
                ]
            },
            |row| {
                let mut cnp = SyndromeCnp {
                    tables: &tables,
                    q: 64,
                    cfg: cfg.clone(),
                };
                black_box(cnp.process_row(row));
            },
            BatchSize::SmallInput,
        )
    });
}

pub fn group_gf_tables(c: &mut Criterion) {
    c.bench_function("gf_tables_build_256", |b| {
        b.iter(|| black_box(GfTables::build(256).unwrap()))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = group_bubble, group_syndrome, group_gf_tables
}
criterion_main!(benches);
