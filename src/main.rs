use anyhow::Result;
use clap::Parser;

use tplconv::cli::{self, Args, CliUtils};
use tplconv::conversion::TreeConverter;
use tplconv::error::TreeError;
use tplconv::logging;

fn main() {
    let args = Args::parse();

    logging::init(args.log_level());

    if let Err(error) = run(&args) {
        cli::handle_error(&error);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = cli::create_tree_config(args)?;
    let converter = cli::create_converter(args);

    let mut engine = TreeConverter::new(config, &converter);
    if args.show_progress() {
        engine = engine.with_progress(CliUtils::create_progress_bar(0));
    }

    let report = engine.mirror(&args.source, &args.dest)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.summary())?);
    } else {
        cli::print_converted(&report, args.quiet);
        if args.stats && !args.quiet {
            cli::print_statistics(&report.stats);
        }
    }

    if !report.is_success() {
        return Err(TreeError::PartialFailure {
            report: Box::new(report),
        }
        .into());
    }

    Ok(())
}
