use anyhow::Result;
use clap::builder::FalseyValueParser;
use clap::Parser;
use owo_colors::OwoColorize;
use std::ffi::OsStr;
use std::io::IsTerminal;
use std::path::PathBuf;
use tolgee_pull::config::{self, Config};
use tolgee_pull::pull;
use tracing::info;

const TOOL_TAG: &str = "[tolgee-pull]";

#[derive(Parser, Debug)]
#[command(name = "tolgee-pull", version, about = "Pull translations from Tolgee into a typed resource module")]
struct Cli {
    /// Project API key
    #[arg(long, env = "TOLGEE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Tolgee instance URL
    #[arg(long, env = "TOLGEE_API_URL", default_value = config::DEFAULT_API_URL)]
    api_url: String,

    /// Comma separated language tags (empty: the project's default export)
    #[arg(long, env = "TOLGEE_LANGUAGES", default_value = "")]
    languages: String,

    /// Comma separated namespaces to export
    #[arg(long, env = "TOLGEE_NAMESPACES", default_value = "")]
    namespaces: String,

    /// Namespace whose keys are merged at the language root
    #[arg(long, env = "TOLGEE_DEFAULT_NAMESPACE")]
    default_namespace: Option<String>,

    /// Generated module path (in split mode, its directory and extension)
    #[arg(long, short, env = "TOLGEE_OUTPUT", default_value = config::DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Write one module per language
    #[arg(long, env = "TOLGEE_SPLIT", value_parser = FalseyValueParser::new())]
    split: bool,

    /// Disable colored output (also set by a non-empty NO_COLOR)
    #[arg(long)]
    no_color: bool,
}

/// Any non-empty `NO_COLOR` turns color off, whatever its value
fn no_color_env(value: Option<&OsStr>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            api_key: self.api_key.unwrap_or_default(),
            api_url: self.api_url,
            languages: config::parse_list(&self.languages),
            namespaces: config::parse_list(&self.namespaces),
            default_namespace: self.default_namespace,
            output_path: self.output,
            split: self.split,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when not present)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tolgee_pull=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let use_color = !cli.no_color
        && !no_color_env(std::env::var_os("NO_COLOR").as_deref())
        && std::io::stderr().is_terminal();
    let config = cli.into_config();

    info!("Starting Tolgee pull from {}", config.api_url);

    match pull::run(&config).await {
        Ok(summary) => {
            let written = summary
                .written
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if use_color {
                eprintln!("{} ✓ Translations written to {}", TOOL_TAG.green().bold(), written);
            } else {
                eprintln!("{} ✓ Translations written to {}", TOOL_TAG, written);
            }
            Ok(())
        }
        Err(e) => {
            let e = anyhow::Error::from(e);
            if use_color {
                eprintln!("{} ✗ {:#}", TOOL_TAG.red().bold(), e);
            } else {
                eprintln!("{} ✗ {:#}", TOOL_TAG, e);
            }
            std::process::exit(1);
        }
    }
}
