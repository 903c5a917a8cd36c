//! Concrete `channel.modulateAndObserve` collaborator: BPSK modulation of the
//! codeword's binary image over an AWGN channel, producing per-symbol LLRs.

use nbldpc_decoder::channel::ChannelModel;
use nbldpc_decoder::intrinsic::IntrinsicStore;
use nbldpc_decoder::GfTables;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// BPSK-over-binary-image AWGN channel: each bit of `BINGF(symbol)` is mapped
/// to +-1, perturbed by zero-mean Gaussian noise whose variance is derived
/// from the code rate and `eb_n0_db`, and the per-symbol LLR is recomputed
/// from the noisy bit observations over every candidate GF(q) symbol.
pub struct AwgnChannel<'a, R> {
    tables: &'a GfTables,
    rate: f32,
    rng: R,
}

impl<'a, R: Rng> AwgnChannel<'a, R> {
    pub fn new(tables: &'a GfTables, rate: f32, rng: R) -> Self {
        AwgnChannel { tables, rate, rng }
    }

    fn noise_std_dev(&self, eb_n0_db: f32) -> f32 {
        let bits_per_symbol = self.tables.log_gf() as f32;
        let eb_n0_linear = 10f32.powf(eb_n0_db / 10.0);
        let es_n0_linear = eb_n0_linear * self.rate * bits_per_symbol;
        (1.0 / (2.0 * es_n0_linear)).sqrt()
    }
}

impl<'a, R: Rng> ChannelModel for AwgnChannel<'a, R> {
    fn modulate_and_observe(&mut self, codeword: &[u16], eb_n0_db: f32) -> IntrinsicStore {
        let q = self.tables.q() as usize;
        let log_gf = self.tables.log_gf() as usize;
        let sigma = self.noise_std_dev(eb_n0_db);
        let normal = Normal::new(0.0f32, sigma).expect("sigma must be finite and positive");

        let mut rows = Vec::with_capacity(codeword.len());
        for &symbol in codeword {
            let bits = self.tables.bingf(symbol);
            let observed: Vec<f32> = bits
                .iter()
                .map(|&b| {
                    let sent = if b == 1 { 1.0 } else { -1.0 };
                    sent + normal.sample(&mut self.rng)
                })
                .collect();

            let mut row = vec![0.0f32; q];
            for g in 0..q {
                let candidate_bits = self.tables.bingf(g as u16);
                let mut cost = 0.0f32;
                for bit in 0..log_gf {
                    let sent = if candidate_bits[bit] == 1 { 1.0 } else { -1.0 };
                    let diff = observed[bit] - sent;
                    cost += diff * diff / (2.0 * sigma * sigma);
                }
                row[g] = cost;
            }
            let best = row.iter().cloned().fold(f32::INFINITY, f32::min);
            for v in row.iter_mut() {
                *v -= best;
            }
            rows.push(row);
        }
        IntrinsicStore::from_rows(q, rows)
    }
}
