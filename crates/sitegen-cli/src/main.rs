use anyhow::Result;
use clap::Parser;
use sitegen_core::{CompanyProfile, OutputMode, ProviderId, Settings};
use std::path::PathBuf;

use sitegen_cli::app;

#[derive(Parser)]
#[command(name = "sitegen")]
#[command(about = "sitegen - describe a company, get a website")]
#[command(version)]
struct Cli {
    /// Company name
    #[arg(short, long)]
    company: Option<String>,

    /// Industry the company works in
    #[arg(short, long)]
    industry: Option<String>,

    /// Primary brand color (any CSS color)
    #[arg(long)]
    color: Option<String>,

    /// Generate once from these requirements and exit
    #[arg(short, long)]
    requirements: Option<String>,

    /// Where to write the generated HTML
    #[arg(short, long, default_value = "index.html")]
    out: PathBuf,

    /// LLM model to use
    #[arg(short, long)]
    model: Option<String>,

    /// LLM provider (claude, openai)
    #[arg(long)]
    provider: Option<String>,

    /// Ask for the bare document instead of a delimited artifact block
    #[arg(long)]
    bare: bool,

    /// Skip image reachability checks
    #[arg(long)]
    no_images: bool,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load();

    if let Some(ref provider) = cli.provider {
        let id = ProviderId::parse(provider)
            .ok_or_else(|| anyhow::anyhow!("unknown provider: {provider}"))?;
        if id != settings.generation.provider {
            settings.generation.provider = id;
            settings.generation.model = id.default_model().to_string();
            settings.generation.api_key_env = id.default_api_key_env().to_string();
            settings.generation.base_url = None;
        }
    }
    if let Some(ref model) = cli.model {
        settings.generation.model = model.clone();
    }
    if cli.bare {
        settings.generation.output_mode = OutputMode::Bare;
    }
    if cli.no_images {
        settings.images.enabled = false;
    }

    if cli.save_config {
        settings.save()?;
        println!("Saved settings to {}", Settings::config_path().display());
        return Ok(());
    }

    let profile = match (cli.company, cli.industry) {
        (Some(name), Some(industry)) => {
            let profile = CompanyProfile::new(name, industry);
            Some(match cli.color {
                Some(color) => profile.with_color(color),
                None => profile,
            })
        }
        _ => None,
    };

    match (cli.requirements, profile) {
        (Some(requirements), Some(profile)) => {
            app::run_single(&settings, profile, &requirements, &cli.out).await?
        }
        (Some(_), None) => anyhow::bail!("--requirements needs --company and --industry"),
        (None, profile) => app::run_chat(&settings, profile).await?,
    }

    Ok(())
}
