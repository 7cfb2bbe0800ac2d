mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "unbox",
    about = "Unpack a Java fat JAR and render a Dockerfile for it"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and extract the configured fat JAR, then render a Dockerfile
    Jar {
        #[command(flatten)]
        source: SourceArgs,
        /// Dockerfile template (Tera syntax); the built-in template is used when omitted
        #[arg(long, short = 't')]
        template: Option<PathBuf>,
        /// Directory the Dockerfile is written to (default: ~/.unbox)
        #[arg(long, env = "UNBOX_WORK_DIR")]
        work_dir: Option<PathBuf>,
        /// Keep the extraction directory instead of deleting it on exit
        #[arg(long)]
        keep_extracted: bool,
    },
    /// Print the manifest of the configured fat JAR without extracting it
    Manifest {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// YAML configuration file
    #[arg(long, short = 'f')]
    file: PathBuf,
    /// HTTP timeout in seconds for remote JARs
    #[arg(long, default_value_t = unbox_fetch::DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Jar {
            source,
            template,
            work_dir,
            keep_extracted,
        } => {
            commands::jar(commands::JarOptions {
                config_path: source.file,
                timeout_secs: source.timeout,
                template,
                work_dir,
                keep_extracted,
            })
            .await?
        }
        Commands::Manifest { source } => commands::manifest(&source.file, source.timeout).await?,
    }

    Ok(())
}
