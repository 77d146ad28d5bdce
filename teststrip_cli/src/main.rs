// CLI entry point for the test strip tempo calculator.
//
// Usage:
//   striptest [OPTIONS]
//     -b, --base <SECONDS>      Base exposure (default: 10)
//     -s, --stepsize <N>        1 = whole stops, 3 = third stops (default: 3)
//     -n, --numsteps <N>        Exposures on the strip (default: 7)
//     -p, --baseplace <N>       Position of the base exposure (default: middle)
//     --tmin / --tmax <BPM>     Tempo range (default: 40..=208)
//     -f, --file <PATH>         Tempo list file instead of the range
//     -d, --divisions <N>       Beats per counted group
//     -c, --cumulative          Count from the start of the strip
//     --config <PATH>           JSON config file
//     --json, --plot-data <PATH>
//
// The table goes to stdout; logs go to stderr.

use clap::Parser;
use tracing::Level;

use teststrip_cli::cli::Args;
use teststrip_cli::config::StripConfig;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => StripConfig::load(path)?,
        None => StripConfig::default(),
    };
    args.apply_to(&mut config);

    let report = teststrip_cli::run(&config)?;

    if let Some(path) = &args.plot_data {
        report.write_plot_data(path)?;
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_table());
    }
    Ok(())
}
