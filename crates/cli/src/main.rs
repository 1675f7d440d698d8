mod commands;

use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bridge-kit")]
#[command(version, about = "Bridge page builder for affiliate marketers", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Skip the simulated service latency
    #[arg(long, global = true)]
    no_delay: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Create a page directory with a starter page.toml
    Init {
        /// Directory to create the page in
        path: PathBuf,

        /// URL path the page will be published under (defaults to the directory name)
        #[arg(long)]
        slug: Option<String>,

        /// Your affiliate link for the promoted product
        #[arg(long)]
        affiliate_link: Option<String>,
    },

    /// Validate a page directory
    Validate {
        /// Path to page directory
        path: PathBuf,
    },

    /// Render the page to a standalone HTML file
    Build {
        /// Path to page directory
        path: PathBuf,

        /// Output directory for the generated file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Publish a page to the local store
    Publish {
        /// Path to page directory
        path: PathBuf,

        /// Skip confirmation prompts
        #[arg(long)]
        force: bool,
    },

    /// Remove a published page
    Unpublish {
        /// Published URL path, e.g. my-page
        path: String,

        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// List published pages
    List,

    /// Export a page to WordPress
    Export {
        /// Path to page directory
        path: PathBuf,
    },

    /// Build a page step by step in the terminal
    Wizard {
        /// Also write the finished page to this directory as page.toml
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Serve published pages locally with hot reload
    Preview {
        /// Port to serve on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    let no_delay = cli.no_delay;

    match cli.command {
        Command::Init {
            path,
            slug,
            affiliate_link,
        } => commands::init::run(path, slug, affiliate_link).await,
        Command::Validate { path } => commands::validate::run(path).await,
        Command::Build { path, output } => commands::build::run(path, output).await,
        Command::Publish { path, force } => commands::deploy::publish(path, force, no_delay).await,
        Command::Unpublish { path, force } => {
            commands::deploy::unpublish(path, force, no_delay).await
        }
        Command::List => commands::deploy::list().await,
        Command::Export { path } => commands::export::run(path, no_delay).await,
        Command::Wizard { save } => commands::wizard::run(save, no_delay).await,
        Command::Preview { port } => commands::preview::run(port).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "bridge-kit", &mut io::stdout());
            Ok(())
        }
    }
}
