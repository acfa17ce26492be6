//! This module contains the main entrypoint to the compression board cli.

use clap::Parser;
use colored::Colorize;
use compression_board_charts::ChartBackend;
use compression_board_scalars::{summary_response, ScalarStore};
use compression_board_util::error::Result;
use compression_board_writer::BenchmarkParser;
use std::{path::PathBuf, time::Duration};
use tracing_subscriber::EnvFilter;

mod summary;

#[derive(Parser)]
#[clap(
	name = "compression-board",
	about = "Compare FP32 and INT8 models from their event logs.",
	setting = clap::AppSettings::DisableHelpSubcommand,
)]
enum Options {
	#[clap(name = "serve")]
	Serve(Box<ServeOptions>),
	#[clap(name = "import")]
	Import(Box<ImportOptions>),
	#[clap(name = "summary")]
	Summary(Box<SummaryOptions>),
}

#[derive(Parser)]
#[clap(about = "run the dashboard")]
#[clap(long_about = "serve the compression dashboard for the runs in a log directory")]
struct ServeOptions {
	#[clap(long, env = "LOGDIR", help = "the directory containing one subdirectory per run")]
	logdir: PathBuf,
	#[clap(long, default_value = "0.0.0.0")]
	host: std::net::IpAddr,
	#[clap(long, env = "PORT", default_value = "6006")]
	port: u16,
	#[clap(
		long,
		default_value = "30",
		help = "seconds between reloads of the log directory, 0 to never reload"
	)]
	reload_interval: u64,
	#[clap(long, help = "the directory containing the built browser client")]
	client_dir: Option<PathBuf>,
	#[clap(
		long,
		default_value = "vector",
		parse(try_from_str = parse_chart_backend),
		help = "how charts are drawn: vector or primitive"
	)]
	chart_backend: ChartBackend,
}

#[derive(Parser, Debug)]
#[clap(about = "import a benchmark")]
#[clap(long_about = "convert a benchmark .json file into event logs, one run per model")]
struct ImportOptions {
	#[clap(help = "the path to your benchmark .json file")]
	file: PathBuf,
	#[clap(long, help = "defaults to runs/compression_benchmark/{file stem}")]
	logdir: Option<PathBuf>,
	#[clap(long, default_value = "0")]
	step: i64,
}

#[derive(Parser, Debug)]
#[clap(about = "print a summary")]
#[clap(long_about = "print the compression summary of a log directory as a table")]
struct SummaryOptions {
	#[clap(long, env = "LOGDIR")]
	logdir: PathBuf,
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| EnvFilter::new("compression_board=info")),
		)
		.with_writer(std::io::stderr)
		.init();
	let options = Options::parse();
	let result = match options {
		Options::Serve(options) => cli_serve(*options),
		Options::Import(options) => cli_import(*options),
		Options::Summary(options) => cli_summary(*options),
	};
	if let Err(error) = result {
		eprintln!("{}: {}", "error".red().bold(), error);
		std::process::exit(1);
	}
}

fn parse_chart_backend(value: &str) -> std::result::Result<ChartBackend, String> {
	ChartBackend::from_key(value)
		.ok_or_else(|| format!("unknown chart backend \"{}\", expected vector or primitive", value))
}

fn cli_serve(options: ServeOptions) -> Result<()> {
	let reload_interval = match options.reload_interval {
		0 => None,
		seconds => Some(Duration::from_secs(seconds)),
	};
	compression_board_app::run(compression_board_app::Options {
		host: options.host,
		port: options.port,
		logdir: options.logdir,
		reload_interval,
		client_dir: options.client_dir,
		chart_backend: options.chart_backend,
	})
}

fn cli_import(options: ImportOptions) -> Result<()> {
	let report = BenchmarkParser::new(options.step).import_file(&options.file, options.logdir.as_deref())?;
	for model in report.imported.iter() {
		eprintln!("{} {}", "imported".green().bold(), model);
	}
	for model in report.skipped.iter() {
		eprintln!("{} {}", "skipped".yellow().bold(), model);
	}
	eprintln!("Event logs were written to {}.", report.logdir.display());
	eprintln!(
		"To view them, run `compression-board serve --logdir {}`.",
		report.logdir.display()
	);
	Ok(())
}

fn cli_summary(options: SummaryOptions) -> Result<()> {
	let store = ScalarStore::load(&options.logdir)?;
	let summary = summary_response(&compression_board_app::host_environment(&store));
	if let Some(error) = summary.error.as_ref() {
		eprintln!("{}: {}", "warning".yellow().bold(), error);
	}
	print!("{}", summary::summary_table(&summary));
	Ok(())
}
