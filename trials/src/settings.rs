//! Command-line surface: positional arguments `NbMonteCarlo NbIterMax
//! FileMatrix EbN NbMax Offset NbOper`, plus a handful of ambient flags
//! (variant selection, truncation size, parallelism, output).

use crate::error::UserInputError;
use clap::{Parser, ValueEnum};
use getset::{CopyGetters, Getters};
use nbldpc_decoder::CnpVariant;
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Bubble,
    Syndrome,
}

impl From<VariantArg> for CnpVariant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Bubble => CnpVariant::BubbleForwardBackward,
            VariantArg::Syndrome => CnpVariant::Syndrome,
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Number of Monte Carlo frames simulated per EbN point
    nb_monte_carlo: u64,
    /// Maximum number of decoding iterations per frame
    nb_iter_max: usize,
    /// Path to the FileMatrix parity-check file
    file_matrix: PathBuf,
    /// Eb/N0 operating point(s) in dB, comma-separated for a multi-point sweep
    eb_n: String,
    /// Stop simulating a point early once this many frame errors are observed
    nb_max: u64,
    /// LLR offset added during check-node processing
    offset: f32,
    /// Operation budget for the bubble check-node processor
    nb_oper: usize,

    #[arg(long, value_enum, default_value_t = VariantArg::Bubble)]
    variant: VariantArg,
    #[arg(long, default_value_t = 16, help = "Truncated message size (nm)")]
    nm: usize,
    #[arg(long, help = "Output file [default: stdout]")]
    output: Option<PathBuf>,
    #[arg(long, help = "If output file already exists, overwrite without backup")]
    overwrite: bool,
    #[arg(long, help = "Run Monte Carlo trials across threads with rayon")]
    parallel: bool,
    #[arg(long, help = "Set number of threads (implies --parallel)")]
    threads: Option<usize>,
    #[arg(short, long, action = clap::ArgAction::Count,
        help = "Print progress to stderr (repeat for more verbose, max 2)")]
    verbose: u8,
    #[arg(long, help = "Tag appended to the results filename")]
    note: Option<String>,
    #[arg(long, help = "PRNG seed [default: random]")]
    seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum OutputTo {
    Stdout,
    File(PathBuf),
}

#[derive(Clone, Debug, Getters, CopyGetters)]
pub struct Settings {
    #[getset(get_copy = "pub")]
    nb_monte_carlo: u64,
    #[getset(get_copy = "pub")]
    nb_iter_max: usize,
    #[getset(get = "pub")]
    file_matrix: PathBuf,
    #[getset(get = "pub")]
    eb_n_points: Vec<f32>,
    #[getset(get_copy = "pub")]
    nb_max: u64,
    #[getset(get_copy = "pub")]
    offset: f32,
    #[getset(get_copy = "pub")]
    nb_oper: usize,
    #[getset(get_copy = "pub")]
    variant: CnpVariant,
    #[getset(get_copy = "pub")]
    nm: usize,
    /// Explicit `--output` request, if any; `None` means "derive the
    /// conventional `data/results_...txt` filename from the loaded code",
    /// `Some(path)` with `path == "-"` means stdout.
    #[getset(get = "pub")]
    output_arg: Option<PathBuf>,
    #[getset(get_copy = "pub")]
    overwrite: bool,
    #[getset(get_copy = "pub")]
    threads: usize,
    #[getset(get_copy = "pub")]
    verbose: u8,
    #[getset(get = "pub")]
    note: String,
    #[getset(get_copy = "pub")]
    seed: Option<u64>,
}

impl Settings {
    pub fn from_args(args: Args) -> Result<Self, UserInputError> {
        if args.nb_monte_carlo == 0 {
            return Err(UserInputError::ZeroMonteCarlo);
        }
        if args.nb_iter_max == 0 {
            return Err(UserInputError::ZeroIterMax);
        }
        if args.nb_oper == 0 {
            return Err(UserInputError::ZeroOper);
        }
        let eb_n_points = parse_eb_n(&args.eb_n)?;

        let threads = args.threads.map_or_else(
            || usize::from(!args.parallel),
            |threads| threads.max(1),
        );

        Ok(Settings {
            nb_monte_carlo: args.nb_monte_carlo,
            nb_iter_max: args.nb_iter_max,
            file_matrix: args.file_matrix,
            eb_n_points,
            nb_max: args.nb_max,
            offset: args.offset,
            nb_oper: args.nb_oper,
            variant: args.variant.into(),
            nm: args.nm,
            output_arg: args.output,
            overwrite: args.overwrite,
            threads,
            verbose: args.verbose,
            note: args.note.unwrap_or_default(),
            seed: args.seed,
        })
    }

    #[inline]
    pub fn parallel(&self) -> bool {
        self.threads != 1
    }

    /// Resolves `--output` against the loaded code's dimensions: no flag
    /// derives the conventional `data/results_...txt` filename (§6); `-`
    /// means stdout; anything else is used verbatim.
    pub fn resolve_output(&self, n: usize, m: usize, gf: u32) -> OutputTo {
        match &self.output_arg {
            None => OutputTo::File(crate::output::results_filename(self, n, m, gf)),
            Some(path) if path.as_os_str() == "-" => OutputTo::Stdout,
            Some(path) => OutputTo::File(path.clone()),
        }
    }
}

fn parse_eb_n(raw: &str) -> Result<Vec<f32>, UserInputError> {
    let points: Result<Vec<f32>, UserInputError> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f32>().map_err(|_| UserInputError::BadEbnEntry(s.to_string())))
        .collect();
    let points = points?;
    if points.is_empty() {
        return Err(UserInputError::EmptyEbnList);
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_eb_n_value() {
        assert_eq!(parse_eb_n("4.5").unwrap(), vec![4.5]);
    }

    #[test]
    fn parses_comma_separated_sweep() {
        assert_eq!(parse_eb_n("1.0, 2.5,3").unwrap(), vec![1.0, 2.5, 3.0]);
    }

    #[test]
    fn rejects_empty_eb_n_list() {
        assert!(matches!(parse_eb_n(""), Err(UserInputError::EmptyEbnList)));
    }

    #[test]
    fn rejects_non_numeric_entry() {
        assert!(matches!(parse_eb_n("abc"), Err(UserInputError::BadEbnEntry(_))));
    }
}
