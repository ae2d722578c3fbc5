#![allow(missing_docs)]

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "asaparse", about = "ARK: Survival Ascended save inspection tools")]
struct Cli {
	/// Raise log verbosity on stderr (-v debug, -vv trace).
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
	#[command(flatten)]
	tuning: cmd::util::Tuning,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Dump the sequentially decoded property bag.
	Props(cmd::props::Args),
	/// Pattern-scan a buffer for one property name.
	Find(cmd::find::Args),
	/// Project player profiles.
	Player(cmd::player::Args),
	/// Project tribe files.
	Tribe(cmd::tribe::Args),
	/// Project the inventory of a profile.
	Inventory(cmd::inventory::Args),
	/// Classify and project one exported world actor blob.
	Actor(cmd::actor::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> asaparse::save::Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	let tuning = &cli.tuning;
	match cli.command {
		Commands::Props(args) => cmd::props::run(args, tuning),
		Commands::Find(args) => cmd::find::run(args, tuning),
		Commands::Player(args) => cmd::player::run(args, tuning),
		Commands::Tribe(args) => cmd::tribe::run(args, tuning),
		Commands::Inventory(args) => cmd::inventory::run(args, tuning),
		Commands::Actor(args) => cmd::actor::run(args, tuning),
	}
}

fn init_tracing(verbose: u8) {
	let filter = match verbose {
		0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		1 => EnvFilter::new("debug"),
		_ => EnvFilter::new("trace"),
	};
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
