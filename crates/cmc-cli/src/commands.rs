use anyhow::{Context, Result};
use tracing::{info, info_span};

use cmc_cli::report::build_report;
use cmc_output::{WriteOverrides, read_cluster, read_cluster_file, strip_sentinels, write_cluster};

use crate::cli::{ConvertArgs, InspectArgs};
use crate::summary::print_report;

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let span = info_span!("inspect", path = %args.file.display());
    let _guard = span.enter();

    let file = read_cluster_file(&args.file)
        .with_context(|| format!("read {}", args.file.display()))?;
    let report = build_report(&file).context("summarize cluster file")?;
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{json}");
    } else {
        print_report(&args.file, &report);
    }
    Ok(())
}

pub fn run_convert(args: &ConvertArgs) -> Result<()> {
    let span = info_span!(
        "convert",
        input = %args.input.display(),
        output = %args.output.display()
    );
    let _guard = span.enter();

    let (stored, stored_binaries) =
        read_cluster(&args.input).with_context(|| format!("read {}", args.input.display()))?;
    let (mut singles, mut binaries) =
        strip_sentinels(&stored, &stored_binaries).context("strip sentinel rows")?;
    // Stored tables carry their metadata, so no overrides are needed.
    write_cluster(
        &mut singles,
        &mut binaries,
        &args.output,
        &WriteOverrides::new(),
    )
    .with_context(|| format!("write {}", args.output.display()))?;
    info!(
        singles = singles.height(),
        binaries = binaries.height(),
        "converted cluster file"
    );
    println!("{} -> {}", args.input.display(), args.output.display());
    Ok(())
}
