//! Correct command: bias-correct every cell of a JSON cell file.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use biascorr_io::{read_cells, write_results};
use biascorr_mapping::{BatchReport, CorrectionConfig, CorrectionContext, correct_batch};

use crate::cli::CorrectArgs;
use crate::config::BiascorrConfig;
use crate::convert;

/// Run the correction pipeline.
pub fn run(args: CorrectArgs) -> Result<()> {
    let _cmd = info_span!("correct").entered();

    // 1. Load config; CLI flags override the file
    let config = match args.config {
        Some(ref path) => BiascorrConfig::load(path)?,
        None => BiascorrConfig::default(),
    };
    let mut correction = convert::build_correction_config(&config.correction)?;
    if let Some(m) = args.method {
        correction = correction.with_method(convert::method_from_arg(m));
    }
    let writer_cfg = convert::build_writer_config(&config.output)?;

    // 2. Read cells
    info!(path = %args.input.display(), "reading cells");
    let mut file = read_cells(&args.input)
        .with_context(|| format!("failed to read cell file: {}", args.input.display()))?;
    if let Some(kind) = convert::build_kind_override(&config.correction)? {
        file = file.with_kind(kind);
    }
    if file.is_empty() {
        warn!("cell file contains no cells");
    }

    // 3. Correct
    info!(
        method = correction.method().name(),
        n_cells = file.len(),
        "correcting cells"
    );
    let contexts = file.to_contexts();
    let report = run_batch(&contexts, &correction, args.threads)?;
    info!(
        n_corrected = report.n_corrected(),
        n_failed = report.n_failed(),
        n_skipped = report.n_skipped(),
        "correction complete"
    );

    // 4. Write results
    write_results(
        &args.output,
        &file,
        correction.method(),
        report.outcomes(),
        &writer_cfg,
    )
    .with_context(|| format!("failed to write results: {}", args.output.display()))?;
    info!(path = %args.output.display(), "results written");

    Ok(())
}

/// Runs the batch on the global rayon pool, or on a dedicated pool when a
/// thread count is given.
fn run_batch(
    contexts: &[CorrectionContext],
    config: &CorrectionConfig,
    threads: Option<usize>,
) -> Result<BatchReport> {
    let report = match threads {
        Some(0) => bail!("--threads must be at least 1"),
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .context("failed to build thread pool")?;
            pool.install(|| correct_batch(contexts, config))
        }
        None => correct_batch(contexts, config),
    };
    report.context("batch correction failed")
}
