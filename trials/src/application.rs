//! Single-threaded Monte Carlo trial loop: for each configured EbN point,
//! repeatedly draw a random codeword, push it through the channel and the
//! decoder, and accumulate frame/bit errors until `NbMonteCarlo` frames have
//! been simulated or `NbMax` frame errors have been observed.

use crate::channel::AwgnChannel;
use crate::random::{current_thread_id, get_or_insert_global_seed, get_rng_from_seed, Seed};
use crate::record::TrialRecord;
use crate::settings::Settings;
use anyhow::Result;
use nbldpc_decoder::{CodeParams, Decoder, DecoderConfig, GfTables};
use rand::Rng;

/// One frame is always the all-zero codeword: for a linear code over a
/// symmetric channel the decoder's error behavior does not depend on which
/// codeword was sent, so simulating the zero codeword is standard practice
/// and avoids needing an encoder.
pub(crate) fn run_one_trial_record<R: Rng>(
    decoder: &mut Decoder,
    tables: &GfTables,
    rate: f32,
    eb_n0_db: f32,
    n: usize,
    rng: &mut R,
) -> (usize, usize, bool) {
    let codeword = vec![0u16; n];
    let mut channel = AwgnChannel::new(tables, rate, rng);
    let intrinsic = channel.modulate_and_observe(&codeword, eb_n0_db);
    let result = decoder.decode_frame(&intrinsic);
    let num_errors = result.decide().iter().filter(|&&g| g != 0).count();
    (num_errors, result.iterations_used(), result.syndrome_zero())
}

pub fn run_point(
    settings: &Settings,
    code: &CodeParams,
    tables: &GfTables,
    eb_n0_db: f32,
    seed: Seed,
) -> Result<TrialRecord> {
    let decoder_config = DecoderConfig {
        variant: settings.variant(),
        nm: settings.nm(),
        nb_iter_max: settings.nb_iter_max(),
        nb_oper: settings.nb_oper(),
        offset: settings.offset(),
        ..DecoderConfig::default()
    };
    let mut decoder = Decoder::new(code.clone(), tables.clone(), decoder_config)?;
    let rate = if code.n() == 0 {
        0.0
    } else {
        code.k() as f32 / code.n() as f32
    };

    let mut rng = get_rng_from_seed(seed, current_thread_id());
    let mut record = TrialRecord::default();
    for _ in 0..settings.nb_monte_carlo() {
        let (num_errors, iterations_used, syndrome_zero) =
            run_one_trial_record(&mut decoder, tables, rate, eb_n0_db, code.n(), &mut rng);
        record.observe(num_errors, iterations_used, syndrome_zero);
        if record.should_stop_early(settings.nb_max()) {
            break;
        }
    }
    Ok(record)
}

pub fn run(settings: &Settings, code: &CodeParams, tables: &GfTables) -> Result<Vec<(f32, TrialRecord)>> {
    let seed = get_or_insert_global_seed(settings.seed().map(Seed::from_u64));
    if settings.verbose() >= 1 {
        eprintln!(
            "Starting Monte Carlo trials (NbMonteCarlo = {}) over {} EbN point(s), seed {}",
            settings.nb_monte_carlo(),
            settings.eb_n_points().len(),
            seed
        );
    }
    let mut results = Vec::with_capacity(settings.eb_n_points().len());
    for &eb_n0_db in settings.eb_n_points() {
        let record = run_point(settings, code, tables, eb_n0_db, seed)?;
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
