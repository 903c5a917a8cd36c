//! Results-file writer: builds the `data/results_...txt` filename, backs up
//! a pre-existing non-empty file under a UUID before overwriting, and
//! appends one formatted line per simulated EbN point.

use crate::record::TrialRecord;
use crate::settings::{OutputTo, Settings};
use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::PathBuf,
    time::SystemTime,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output file path should be accessible")]
    Inaccessible(#[source] io::Error),
    #[error("should be able to back up existing file")]
    FailedBackup(#[source] io::Error),
    #[error("output stream should be writable")]
    NotWritable(#[source] io::Error),
}

/// `data/results_N<n>_CR<rate>_GF<gf>_IT<iter_max>_Offset<offset>_nm<nm>_<note>.txt`
pub fn results_filename(settings: &Settings, n: usize, m: usize, gf: u32) -> PathBuf {
    let rate = if n == 0 { 0.0 } else { (n - m) as f32 / n as f32 };
    let note = settings.note();
    PathBuf::from("data").join(format!(
        "results_N{n}_CR{rate:.3}_GF{gf}_IT{it}_Offset{offset}_nm{nm}_{note}.txt",
        n = n,
        rate = rate,
        gf = gf,
        it = settings.nb_iter_max(),
        offset = settings.offset(),
        nm = settings.nm(),
        note = note,
    ))
}

pub fn check_writable(output: &OutputTo, overwrite: bool) -> Result<(), OutputError> {
    if let OutputTo::File(path) = output {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(OutputError::Inaccessible)?;
            }
        }
        let exists_and_nonempty = path.try_exists().map_err(OutputError::Inaccessible)?
            && fs::metadata(path).map_err(OutputError::Inaccessible)?.len() > 0;
        if exists_and_nonempty && !overwrite {
            fs::copy(path, format!("{}-backup-{}", path.display(), Uuid::new_v4()))
                .map_err(OutputError::FailedBackup)?;
        }
        if exists_and_nonempty && overwrite {
            File::create(path).map_err(OutputError::NotWritable)?;
        }
    }
    Ok(())
}

/// `SNR:<v>: FER= <e>/<n> = <rate> BER= <b>/<x> = <rate> avr_it= <f> time: <timestamp>`
pub fn format_result_line(eb_n0_db: f32, record: &TrialRecord, symbols_per_frame: usize) -> String {
    let total_symbols = record.num_trials() * symbols_per_frame as u64;
    let timestamp = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!(
        "SNR:{eb_n0:.3}: FER= {fe}/{n} = {fer:.6e} BER= {be}/{x} = {ber:.6e} avr_it= {avr:.3} time: {ts}",
        eb_n0 = eb_n0_db,
        fe = record.num_frame_errors(),
        n = record.num_trials(),
        fer = record.fer(),
        be = record.num_symbol_errors(),
        x = total_symbols,
        ber = record.ber(symbols_per_frame),
        avr = record.average_iterations(),
        ts = timestamp,
    )
}

pub fn append_result_line(output: &OutputTo, line: &str) -> Result<(), OutputError> {
    match output {
        OutputTo::Stdout => {
            println!("{line}");
            Ok(())
        }
        OutputTo::File(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(OutputError::NotWritable)?;
            writeln!(file, "{line}").map_err(OutputError::NotWritable)?;
            file.flush().map_err(OutputError::NotWritable)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_result_line_with_expected_fields() {
        let mut record = TrialRecord::default();
        record.observe(2, 5, false);
        record.observe(0, 3, true);
        let line = format_result_line(4.5, &record, 8);
        assert!(line.starts_with("SNR:4.500: FER= 1/2 ="));
        assert!(line.contains("BER= 2/16 ="));
        assert!(line.contains("avr_it= 4.000"));
        assert!(line.contains("time: "));
    }
}
