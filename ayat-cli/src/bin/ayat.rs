use ayat_cli::{init_observability, run, Config};
use clap::Parser;
use std::io::Write;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_observability(config.verbose, config.log_json);

    info!("Verse collection: {:?}", config.verses);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let hits = run(&config, &mut out)?;
    out.flush()?;

    if hits == 0 {
        eprintln!("no verse matches {:?}", config.query);
    }
    info!(hits, "search finished");
    Ok(())
}
