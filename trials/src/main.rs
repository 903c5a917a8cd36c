use anyhow::{Context, Result};
use clap::Parser;
use nbldpc_decoder::GfTables;
use nbldpc_trials::settings::{Args, Settings};
use nbldpc_trials::{application, code_loader, output, parallel};

fn run(settings: &Settings) -> Result<()> {
    let code = code_loader::load_code_params(settings.file_matrix())
        .with_context(|| format!("loading FileMatrix at {}", settings.file_matrix().display()))?;
    let tables = GfTables::build(code.gf()).context("building GF(q) arithmetic tables")?;
    code.check_full_rank(&tables)
        .context("FileMatrix parity-check matrix must be full rank")?;

    let output = settings.resolve_output(code.n(), code.m(), code.gf());
    output::check_writable(&output, settings.overwrite()).context("preparing results output")?;

    let results = if settings.parallel() {
        parallel::run(settings, &code, &tables)?
    } else {
        application::run(settings, &code, &tables)?
    };

    for (eb_n0_db, record) in &results {
        let line = output::format_result_line(*eb_n0_db, record, code.n());
        output::append_result_line(&output, &line).context("writing results line")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::from_args(args).context("validating command-line arguments")?;
    run(&settings)
}
