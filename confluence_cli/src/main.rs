use std::process;

use clap::Parser;
use confluence_cli::ConfluenceCli;
use confluence_core::Confluence;
use confluence_core::ConfluenceError;
use confluence_core::FsResolver;
use tokio::io::AsyncRead;
use tokio::io::AsyncWrite;
use tracing_subscriber::EnvFilter;

fn main() {
	let args = ConfluenceCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(&args, use_color);

	if let Err(e) = run(&args) {
		match e.downcast::<ConfluenceError>() {
			Ok(error) => {
				let report: miette::Report = (*error).into();
				eprintln!("{report:?}");
			}
			Err(e) => eprintln!("error: {e}"),
		}
		process::exit(2);
	}
}

fn init_tracing(args: &ConfluenceCli, use_color: bool) {
	let default_level = if args.verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn run(args: &ConfluenceCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = args.resolve_root();
	let config = args.resolve_config(&root)?;
	tracing::debug!(root = %root.display(), ?config, "resolved settings");

	let rt = tokio::runtime::Runtime::new()?;
	rt.block_on(async {
		let input: Box<dyn AsyncRead + Unpin> = match args.input_path() {
			Some(path) => Box::new(tokio::fs::File::open(path).await?),
			None => Box::new(tokio::io::stdin()),
		};

		let mut output: Box<dyn AsyncWrite + Unpin> = match &args.output {
			Some(path) => Box::new(tokio::fs::File::create(path).await?),
			None => Box::new(tokio::io::stdout()),
		};

		let mut stream = Confluence::with_config(&config, FsResolver::new(root.clone()))?;
		let bytes = stream.pipe(input, &mut output).await?;

		if args.verbose {
			eprintln!("Processed {bytes} byte(s)");
		}

		Ok::<_, Box<dyn std::error::Error>>(())
	})
}
