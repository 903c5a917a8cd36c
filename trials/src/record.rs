//! Per-SNR-point accumulator: frame/bit error counts and the running total
//! of iterations used, from which FER, BER, and average iteration count are
//! derived.

use getset::CopyGetters;
use std::ops::AddAssign;

#[derive(Clone, Copy, Debug, Default, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct TrialRecord {
    num_trials: u64,
    num_frame_errors: u64,
    num_symbol_errors: u64,
    iterations_sum: u64,
}

impl TrialRecord {
    pub fn observe(&mut self, num_symbols_in_error: usize, iterations_used: usize, syndrome_zero: bool) {
        self.num_trials += 1;
        self.iterations_sum += iterations_used as u64;
        if !syndrome_zero || num_symbols_in_error > 0 {
            self.num_frame_errors += 1;
        }
        self.num_symbol_errors += num_symbols_in_error as u64;
    }

    pub fn fer(&self) -> f64 {
        if self.num_trials == 0 {
            0.0
        } else {
            self.num_frame_errors as f64 / self.num_trials as f64
        }
    }

    pub fn ber(&self, symbols_per_frame: usize) -> f64 {
        let total_symbols = self.num_trials * symbols_per_frame as u64;
        if total_symbols == 0 {
            0.0
        } else {
            self.num_symbol_errors as f64 / total_symbols as f64
        }
    }

    pub fn average_iterations(&self) -> f64 {
        if self.num_trials == 0 {
            0.0
        } else {
            self.iterations_sum as f64 / self.num_trials as f64
        }
    }

    pub fn should_stop_early(&self, nb_max: u64) -> bool {
        nb_max > 0 && self.num_frame_errors >= nb_max
    }
}

impl AddAssign for TrialRecord {
    fn add_assign(&mut self, other: Self) {
        self.num_trials += other.num_trials;
        self.num_frame_errors += other.num_frame_errors;
        self.num_symbol_errors += other.num_symbol_errors;
        self.iterations_sum += other.iterations_sum;
    }
}
