use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use secdb::{
    config::Config,
    output::{print_records, OutputFormat},
    scanner::{DirectoryScanner, Scanner},
    Generator, PackageRecord,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;

mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
}

#[derive(Parser)]
#[command(name = "secdb")]
#[command(
    author,
    version,
    about = "Generate an apk security database from melange package definitions"
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors and suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a security database
    #[command(after_help = "Example:\n  secdb generate --repo-name os ./os ...")]
    Generate(GenerateArgs),

    /// Show the secfixes declared by package documents
    Inspect {
        /// Directories containing package documents
        #[arg(required = true)]
        dirs: Vec<PathBuf>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Directories containing package documents
    #[arg(required = true)]
    dirs: Vec<PathBuf>,

    /// The repository name to use
    #[arg(long)]
    repo_name: Option<String>,

    /// The repository base URL to use [default: https://packages.wolfi.dev]
    #[arg(long)]
    base_url: Option<String>,

    /// The output filename to use [default: security.json]
    #[arg(long)]
    output_filename: Option<PathBuf>,

    /// The package architectures the security database is for [default: x86_64]
    #[arg(long, value_delimiter = ',')]
    archs: Option<Vec<String>>,
}

impl GenerateArgs {
    fn apply(self, mut config: Config) -> (Config, Vec<PathBuf>) {
        if let Some(repo_name) = self.repo_name {
            config = config.with_repo_name(repo_name);
        }
        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(output) = self.output_filename {
            config = config.with_output(output);
        }
        if let Some(archs) = self.archs {
            config = config.with_archs(archs);
        }
        (config, self.dirs)
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn run() -> Result<u8> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.command {
        Commands::Generate(args) => {
            let (config, dirs) = args.apply(Config::load()?);
            generate(config, &dirs, cli.quiet)
        }
        Commands::Inspect { dirs, format } => {
            let format = OutputFormat::from_str(&format).map_err(|e| anyhow::anyhow!(e))?;
            inspect(&dirs, format)
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SECDB_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn generate(config: Config, dirs: &[PathBuf], quiet: bool) -> Result<u8> {
    let generator = Generator::new(config)?;

    let progress = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Generating security database...");
        Some(pb)
    };

    let result = generator.run(dirs);

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let db = result?;
    if !quiet {
        println!(
            "Wrote {} packages to {}",
            db.packages.len(),
            generator.config().output.display()
        );
    }

    Ok(exit_codes::SUCCESS)
}

fn inspect(dirs: &[PathBuf], format: OutputFormat) -> Result<u8> {
    let records = collect_records(dirs)?;
    print_records(&records, format)?;
    Ok(exit_codes::SUCCESS)
}

fn collect_records(dirs: &[PathBuf]) -> Result<Vec<PackageRecord>> {
    let mut records = Vec::new();
    for dir in dirs {
        records.extend(DirectoryScanner::new(dir).scan()?);
    }
    Ok(records)
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
        } else {
            Config::default().save()?;
            println!("Created config file at: {}", config_path.display());
            println!();
            println!("{}", Config::generate_default_config());
        }
        return Ok(());
    }

    let source = if config_path.exists() {
        format!("Config file: {}", config_path.display())
    } else {
        format!(
            "No config file at {}, showing defaults (create one with 'secdb config --init')",
            config_path.display()
        )
    };
    println!("{}", source);
    println!();
    println!("{}", Config::load()?.to_toml()?);

    Ok(())
}
