//! Check-config command: parse and validate a configuration file.

use anyhow::Result;
use tracing::info_span;

use crate::cli::CheckConfigArgs;
use crate::config::BiascorrConfig;
use crate::convert;

/// Validate the configuration file and print the resolved settings.
pub fn run(args: CheckConfigArgs) -> Result<()> {
    let _cmd = info_span!("check_config").entered();

    let config = BiascorrConfig::load(&args.config)?;
    let correction = convert::build_correction_config(&config.correction)?;
    let kind = convert::build_kind_override(&config.correction)?;
    convert::build_writer_config(&config.output)?;

    println!("{}: ok", args.config.display());
    println!("  method:                {}", correction.method().name());
    println!("  seasonality:           {:?}", correction.seasonality());
    println!("  estimator:             {:?}", correction.estimator());
    println!("  trend model:           {:?}", correction.trend_model());
    println!("  extrapolation:         {:?}", correction.extrapolation_policy());
    println!("  min reference samples: {}", correction.min_reference_samples());
    println!("  wet-day threshold:     {}", correction.wet_day_threshold());
    match kind {
        Some(k) => println!("  variable kind:         {k:?} (overrides input)"),
        None => println!("  variable kind:         from input"),
    }
    println!("  time format:           {}", config.output.time_format);
    Ok(())
}
