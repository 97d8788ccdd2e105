mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use dispatch_core::ContractKind;
use output::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dispatch")]
#[command(version, about = "Contract-checked tool and component dispatcher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Declaration file (YAML, TOML or JSON); the built-in declarations when omitted
    #[arg(short, long, global = true)]
    declarations: Option<PathBuf>,

    /// Collaborator configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the declarations and build the registry without invoking anything
    Check,

    /// List registered tools and components
    List {
        /// Only list contracts of this kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Invoke a tool and print the result envelope
    Invoke {
        /// Tool name
        name: String,

        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Select a component and print the render descriptor
    Select {
        /// Component name
        name: String,

        /// Props as a JSON object
        #[arg(short, long, default_value = "{}")]
        props: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Tool,
    Component,
}

impl From<KindArg> for ContractKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Tool => ContractKind::Tool,
            KindArg::Component => ContractKind::Component,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let source = commands::Source {
        declarations: cli.declarations.as_deref(),
        config: cli.config.as_deref(),
    };

    match cli.command {
        Commands::Check => commands::check::execute(&source, cli.format),

        Commands::List { kind } => commands::list::execute(&source, kind.map(Into::into), cli.format),

        Commands::Invoke { name, args } => {
            commands::invoke::execute(&source, &name, &args, cli.format).await
        }

        Commands::Select { name, props } => {
            commands::select::execute(&source, &name, &props, cli.format)
        }
    }
}
