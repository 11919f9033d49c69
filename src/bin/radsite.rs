use anyhow::Result;
use log::LevelFilter;
use radsite::config::{DEFAULT_CONFIG_PATH, RunConfig};
use radsite::run;
use std::env;
use std::path::Path;

fn usage() {
    eprintln!(
        "Usage:\n  \
  radsite --help\n  \
  radsite --config\n  \
  radsite [--option=value ...]\n\n\
radsite searches the restriction sites of a genome, digests it in silico\n\
with one or two enzymes and writes the resulting fragments in FASTA format.\n\n\
'--config' writes the config file '{DEFAULT_CONFIG_PATH}' with the default\n\
option values; options are read from that file and can be overridden on the\n\
command line:\n\n{}",
        RunConfig::option_help()
    );
}

fn main() {
    if let Err(e) = run_cli() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        usage();
        return Ok(());
    }
    if args.iter().any(|a| a == "--config") {
        RunConfig::write_default_file(Path::new(DEFAULT_CONFIG_PATH))?;
        println!("The configuration file '{DEFAULT_CONFIG_PATH}' is created.");
        return Ok(());
    }

    let config = RunConfig::from_sources(Path::new(DEFAULT_CONFIG_PATH), &args)?;
    let level = if config.trace {
        LevelFilter::Trace
    } else if config.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let summary = run::run(&config)?;
    println!(
        "Loci processed: {} - fragments written: {} of {} candidates",
        summary.loci, summary.written_fragments, summary.total_fragments
    );
    Ok(())
}
