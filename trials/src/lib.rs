//! Monte Carlo simulation driver for the core decoding engine: loads a
//! parity-check matrix, drives it over a BPSK/AWGN channel across one or
//! more EbN operating points, and reports FER/BER/average-iteration
//! statistics in the same results-file format as the program this driver
//! replaces.

pub mod application;
pub mod channel;
pub mod code_loader;
pub mod error;
pub mod output;
pub mod parallel;
pub mod random;
pub mod record;
pub mod settings;
