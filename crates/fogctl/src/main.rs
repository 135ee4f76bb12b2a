use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use fogcat_core::ResourceKind;

mod commands;

#[derive(Parser)]
#[command(
    name = "fogctl",
    about = "Inspect and edit the fog orchestration catalog",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Catalog configuration file
    #[arg(short, long, global = true, default_value = "fogcat.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Resource kinds as spelled on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Kind {
    Job,
    Fim,
    Cloud,
    Entity,
    Vl,
    Fdu,
}

impl From<Kind> for ResourceKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Job => ResourceKind::Job,
            Kind::Fim => ResourceKind::Fim,
            Kind::Cloud => ResourceKind::Cloud,
            Kind::Entity => ResourceKind::Entity,
            Kind::Vl => ResourceKind::VirtualLink,
            Kind::Fdu => ResourceKind::Fdu,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a fogcat.toml scaffold with a redb-backed store
    Init {
        #[arg(long)]
        system: String,
        #[arg(long)]
        tenant: String,
        /// Database file for the catalog
        #[arg(long, default_value = "fogcat.redb")]
        db: PathBuf,
    },
    /// Store a descriptor (or, with --record, a record) read from a JSON file
    Put {
        kind: Kind,
        #[arg(short, long)]
        file: PathBuf,
        #[arg(long)]
        record: bool,
    },
    /// Print one descriptor, or one record with --instance
    Get {
        kind: Kind,
        id: String,
        #[arg(short, long)]
        instance: Option<String>,
    },
    /// Print every descriptor of a kind
    List { kind: Kind },
    /// Print the records of one descriptor, or of all descriptors of the kind
    Records { kind: Kind, id: Option<String> },
    /// Delete a descriptor, or one record with --instance
    Remove {
        kind: Kind,
        id: String,
        #[arg(short, long)]
        instance: Option<String>,
    },
    /// Print the catalog key of a descriptor or record
    Path {
        kind: Kind,
        id: String,
        #[arg(short, long)]
        instance: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fogctl=info".parse()?)
                .add_directive("fogcat=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { system, tenant, db } => {
            commands::init::init(&cli.config, &system, &tenant, &db)
        }
        Commands::Put { kind, file, record } => {
            let orchestrator = commands::open(&cli.config)?;
            commands::catalog::put(&orchestrator, kind.into(), &file, record)
        }
        Commands::Get { kind, id, instance } => {
            let orchestrator = commands::open(&cli.config)?;
            commands::catalog::get(&orchestrator, kind.into(), &id, instance.as_deref())
        }
        Commands::List { kind } => {
            let orchestrator = commands::open(&cli.config)?;
            commands::catalog::list(&orchestrator, kind.into())
        }
        Commands::Records { kind, id } => {
            let orchestrator = commands::open(&cli.config)?;
            commands::catalog::records(&orchestrator, kind.into(), id.as_deref())
        }
        Commands::Remove { kind, id, instance } => {
            let orchestrator = commands::open(&cli.config)?;
            commands::catalog::remove(&orchestrator, kind.into(), &id, instance.as_deref())
        }
        Commands::Path { kind, id, instance } => {
            let orchestrator = commands::open(&cli.config)?;
            commands::catalog::path(&orchestrator, kind.into(), &id, instance.as_deref())
        }
    }
}
