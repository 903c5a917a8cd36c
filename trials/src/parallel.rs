//! Rayon-parallel variant of the Monte Carlo trial loop: each EbN point is
//! split into chunks of trials distributed across a thread pool, with
//! partial `TrialRecord`s merged back on the calling thread via a
//! crossbeam channel.

use crate::application::run_one_trial_record;
use crate::random::{current_thread_id, custom_thread_rng, get_or_insert_global_seed};
use crate::record::TrialRecord;
use crate::settings::Settings;
use anyhow::Result;
use crossbeam_channel::{unbounded as channel, Sender, TryRecvError};
use nbldpc_decoder::{CodeParams, Decoder, DecoderConfig, GfTables};
use rayon::prelude::*;

const CHUNK_SIZE: u64 = 256;
/// Trials dispatched to the pool per round before the early-stop check runs
/// again; many multiples of `CHUNK_SIZE` so a round actually splits into
/// enough tasks to keep every thread busy, rather than the single task a
/// round sized to `CHUNK_SIZE` itself would produce.
const TRIALS_PER_ROUND: u64 = CHUNK_SIZE * 16;

fn decoder_for(settings: &Settings, code: &CodeParams, tables: &GfTables) -> Result<Decoder> {
    let decoder_config = DecoderConfig {
        variant: settings.variant(),
        nm: settings.nm(),
        nb_iter_max: settings.nb_iter_max(),
        nb_oper: settings.nb_oper(),
        offset: settings.offset(),
        ..DecoderConfig::default()
    };
    Ok(Decoder::new(code.clone(), tables.clone(), decoder_config)?)
}

fn run_chunk(settings: &Settings, code: &CodeParams, tables: &GfTables, eb_n0_db: f32, chunk_len: u64) -> Result<TrialRecord> {
    let mut decoder = decoder_for(settings, code, tables)?;
    let rate = if code.n() == 0 {
        0.0
    } else {
        code.k() as f32 / code.n() as f32
    };
    let mut rng = custom_thread_rng();
    let mut record = TrialRecord::default();
    for _ in 0..chunk_len {
        let (num_errors, iterations_used, syndrome_zero) =
            run_one_trial_record(&mut decoder, tables, rate, eb_n0_db, code.n(), &mut rng);
        record.observe(num_errors, iterations_used, syndrome_zero);
    }
    Ok(record)
}

pub fn run_point_parallel(
    settings: &Settings,
    code: &CodeParams,
    tables: &GfTables,
    eb_n0_db: f32,
    pool: &rayon::ThreadPool,
) -> Result<TrialRecord> {
    let (tx, rx): (Sender<TrialRecord>, _) = channel();
    let mut trials_remaining = settings.nb_monte_carlo();
    let mut record = TrialRecord::default();
    while trials_remaining > 0 && !record.should_stop_early(settings.nb_max()) {
        let batch = TRIALS_PER_ROUND.min(trials_remaining);
        let num_chunks = (batch + CHUNK_SIZE - 1) / CHUNK_SIZE;
        let chunk_sizes: Vec<u64> = split_evenly(batch, num_chunks.max(1));
        pool.install(|| {
            chunk_sizes.into_par_iter().for_each_with(tx.clone(), |tx, chunk_len| {
                if let Ok(partial) = run_chunk(settings, code, tables, eb_n0_db, chunk_len) {
                    let _ = tx.send(partial);
                }
            });
        });
        // Every send for this round has already happened by the time
        // `pool.install` returns, so draining here (rather than only once
        // after the loop) lets `should_stop_early` see this round's results
        // before the next round is dispatched.
        loop {
            match rx.try_recv() {
                Ok(partial) => record += partial,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
        trials_remaining -= batch;
    }
    drop(tx);
    for partial in rx {
        record += partial;
    }
    Ok(record)
}

fn split_evenly(total: u64, parts: u64) -> Vec<u64> {
    let base = total / parts;
    let remainder = total % parts;
    (0..parts)
        .map(|i| base + u64::from(i < remainder))
        .filter(|&n| n > 0)
        .collect()
}

pub fn run(settings: &Settings, code: &CodeParams, tables: &GfTables) -> Result<Vec<(f32, TrialRecord)>> {
    let seed = get_or_insert_global_seed(settings.seed().map(crate::random::Seed::from_u64));
    let _ = current_thread_id();
    let thread_count = if settings.threads() == 0 {
        num_cpus::get()
    } else {
        settings.threads()
    };
    if settings.verbose() >= 1 {
        eprintln!(
            "Starting parallel Monte Carlo trials across {thread_count} threads, seed {seed}"
        );
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.threads())
        .build()?;
    let mut results = Vec::with_capacity(settings.eb_n_points().len());
    for &eb_n0_db in settings.eb_n_points() {
        let record = run_point_parallel(settings, code, tables, eb_n0_db, &pool)?;
        if settings.verbose() >= 1 {
            eprintln!(
                "EbN = {eb_n0_db}: FER = {:.6e} over {} trials",
                record.fer(),
                record.num_trials()
            );
        }
        results.push((eb_n0_db, record));
    }
    Ok(results)
}
