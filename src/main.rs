//! Good Badger CLI

use clap::{CommandFactory, Parser};

use goodbadger::cli::{self, Cli, Commands, GlobalOptions};
use goodbadger::error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `--debug`, then a quieter level for one-shot commands
fn init_logging(debug: bool, serving: bool) {
    let default_filter = match (debug, serving) {
        (true, _) => "debug",
        (false, true) => "warn,goodbadger=info",
        (false, false) => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug, matches!(cli.command, Commands::Serve { .. }));

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Serve { port } => cli::serve::run(&opts, port).await,
        Commands::Search { query } => cli::directory::search(&opts, &query).await,
        Commands::Lookup { ein } => cli::directory::lookup(&opts, &ein).await,
        Commands::Titles { names } => cli::generate::titles(&opts, &names).await,
        Commands::Badge { title, out } => cli::generate::badge(&opts, &title, out.as_deref()).await,
        Commands::Render { title, nonprofits } => {
            cli::generate::render(&opts, &title, &nonprofits).await
        }
        Commands::Create { out } => cli::create::run(&opts, &out).await,
        Commands::Completion { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "goodbadger",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
