//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use siteforge_content::HttpGenerativeClient;
use siteforge_core::generate_site;
use siteforge_profiles::ProfileRegistry;
use siteforge_shared::{
    AppConfig, PipelineConfig, ProgressEvent, Requirements, ServiceOffering, Stage, WebsiteBundle,
    init_config, load_config, validate_api_key,
};
use tokio::sync::{mpsc, watch};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// SiteForge: generate a complete website from a business profile.
#[derive(Parser)]
#[command(
    name = "siteforge",
    version,
    about = "Generate a themed, multi-page website bundle from a business profile.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate a website bundle.
    Generate {
        /// Path to a JSON requirements file.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Business name (required unless --input is given).
        #[arg(short, long)]
        name: Option<String>,

        /// Business type/industry text (e.g., "italian restaurant").
        #[arg(short = 't', long = "type")]
        business_type: Option<String>,

        /// Business location, used for local SEO.
        #[arg(short, long)]
        location: Option<String>,

        /// Copy tone (e.g., warm, professional, playful).
        #[arg(long)]
        tone: Option<String>,

        /// Page to include (repeatable; defaults to Home).
        #[arg(short, long = "page")]
        pages: Vec<String>,

        /// Service offering as "Name" or "Name: description" (repeatable).
        #[arg(short, long = "service")]
        services: Vec<String>,

        /// Style keyword (repeatable; e.g., minimal, bold, elegant).
        #[arg(long = "style")]
        styles: Vec<String>,

        /// Feature request (repeatable; e.g., "contact form").
        #[arg(long = "feature")]
        features: Vec<String>,

        /// Output directory (defaults to the configured output_dir).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List the built-in industry profiles.
    Profiles,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "siteforge=info",
        1 => "siteforge=debug",
        _ => "siteforge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            input,
            name,
            business_type,
            location,
            tone,
            pages,
            services,
            styles,
            features,
            out,
        } => {
            let requirements = build_requirements(
                input.as_deref(),
                name,
                business_type,
                location,
                tone,
                pages,
                services,
                styles,
                features,
            )?;
            cmd_generate(requirements, out).await
        }
        Command::Profiles => cmd_profiles(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Requirements assembly
// ---------------------------------------------------------------------------

/// Build requirements from an input file, flags, or both (flags win).
#[allow(clippy::too_many_arguments)]
fn build_requirements(
    input: Option<&std::path::Path>,
    name: Option<String>,
    business_type: Option<String>,
    location: Option<String>,
    tone: Option<String>,
    pages: Vec<String>,
    services: Vec<String>,
    styles: Vec<String>,
    features: Vec<String>,
) -> Result<Requirements> {
    let mut requirements = match input {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| eyre!("cannot read {}: {e}", path.display()))?;
            serde_json::from_str::<Requirements>(&content)
                .map_err(|e| eyre!("invalid requirements in {}: {e}", path.display()))?
        }
        None => Requirements {
            business_name: name
                .clone()
                .ok_or_else(|| eyre!("either --input or --name is required"))?,
            business_type: String::new(),
            location: None,
            audience: None,
            tone: None,
            services: vec![],
            pages: vec![],
            brand_colors: None,
            style_keywords: vec![],
            features: vec![],
        },
    };

    if let Some(name) = name {
        requirements.business_name = name;
    }
    if let Some(business_type) = business_type {
        requirements.business_type = business_type;
    }
    if location.is_some() {
        requirements.location = location;
    }
    if tone.is_some() {
        requirements.tone = tone;
    }
    if !pages.is_empty() {
        requirements.pages = pages;
    }
    if !services.is_empty() {
        requirements.services = services.iter().map(|s| parse_service(s)).collect();
    }
    if !styles.is_empty() {
        requirements.style_keywords = styles;
    }
    if !features.is_empty() {
        requirements.features = features;
    }

    Ok(requirements)
}

/// Parse "Name" or "Name: description" into a service offering.
fn parse_service(raw: &str) -> ServiceOffering {
    match raw.split_once(':') {
        Some((name, description)) => ServiceOffering {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
        },
        None => ServiceOffering {
            name: raw.trim().to_string(),
            description: String::new(),
        },
    }
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

async fn cmd_generate(requirements: Requirements, out: Option<PathBuf>) -> Result<()> {
    let config = load_config()?;
    validate_api_key(&config)?;
    let pipeline_config = PipelineConfig::from(&config);

    let api_key = std::env::var(&config.generative.api_key_env).ok();
    let client = Arc::new(HttpGenerativeClient::new(
        &config.generative.endpoint,
        config.generative.model.clone(),
        api_key,
        pipeline_config.call_timeout,
    )?);

    let output_root = match out {
        Some(path) => path,
        None => expand_tilde(&config.defaults.output_dir),
    };

    info!(
        business = %requirements.business_name,
        model = %config.generative.model,
        "starting website generation"
    );

    let (events_tx, events_rx) = mpsc::unbounded_channel::<ProgressEvent>();
    let (cancel_tx, cancel_rx) = watch::channel(false);

    // Ctrl-C requests cancellation; the pipeline winds down at the next
    // stage boundary.
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let progress_task = tokio::spawn(render_progress(events_rx));

    let start = std::time::Instant::now();
    let result = generate_site(client, requirements, &pipeline_config, events_tx, cancel_rx).await;
    let _ = progress_task.await;
    let bundle = result?;

    let bundle_dir = write_bundle(&output_root, &bundle)?;

    println!();
    println!("  Website bundle generated!");
    println!("  Run:     {}", bundle.run_id);
    println!("  Pages:   {}", bundle.pages.len());
    if !bundle.missing_pages.is_empty() {
        println!("  Missing: {}", bundle.missing_pages.join(", "));
    }
    println!(
        "  Quality: {:.1}/10 ({})",
        bundle.meta.quality.aggregate,
        if bundle.meta.quality.meets_thresholds {
            "passed"
        } else {
            "below threshold"
        }
    );
    if !bundle.meta.quality.issues.is_empty() {
        println!("  Issues:  {}", bundle.meta.quality.issues.len());
    }
    println!("  Path:    {}", bundle_dir.display());
    println!("  Time:    {:.1}s", start.elapsed().as_secs_f64());
    println!();

    Ok(())
}

/// Drive an indicatif bar from the progress event stream.
async fn render_progress(mut events: mpsc::UnboundedReceiver<ProgressEvent>) {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
            .expect("static progress template"),
    );

    while let Some(event) = events.recv().await {
        bar.set_position(event.progress as u64);
        bar.set_message(event.message.clone());

        match event.stage {
            Stage::Complete => bar.finish_and_clear(),
            Stage::Cancelled => bar.abandon_with_message("cancelled"),
            Stage::Error => {
                let detail = event
                    .error
                    .map(|e| e.message)
                    .unwrap_or_else(|| "failed".to_string());
                bar.abandon_with_message(detail);
            }
            _ => {}
        }
    }
}

/// Write `bundle.json` plus one JSON file per page under
/// `<root>/<run_id>/`.
fn write_bundle(root: &std::path::Path, bundle: &WebsiteBundle) -> Result<PathBuf> {
    let dir = root.join(bundle.run_id.to_string());
    let pages_dir = dir.join("pages");
    std::fs::create_dir_all(&pages_dir)
        .map_err(|e| eyre!("cannot create {}: {e}", pages_dir.display()))?;

    let bundle_path = dir.join("bundle.json");
    std::fs::write(&bundle_path, serde_json::to_string_pretty(bundle)?)
        .map_err(|e| eyre!("cannot write {}: {e}", bundle_path.display()))?;

    for page in &bundle.pages {
        let page_path = pages_dir.join(format!("{}.json", page.slug));
        std::fs::write(&page_path, serde_json::to_string_pretty(page)?)
            .map_err(|e| eyre!("cannot write {}: {e}", page_path.display()))?;
    }

    Ok(dir)
}

/// Expand a leading `~/` against the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

// ---------------------------------------------------------------------------
// profiles / config
// ---------------------------------------------------------------------------

fn cmd_profiles() -> Result<()> {
    let registry = ProfileRegistry::new();
    println!();
    for profile in registry.all() {
        println!("  {:<12} {}", profile.id, profile.keywords.join(", "));
    }
    println!();
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_parsing_splits_on_first_colon() {
        let service = parse_service("Brand Identity: logos and guidelines");
        assert_eq!(service.name, "Brand Identity");
        assert_eq!(service.description, "logos and guidelines");

        let bare = parse_service("Web Design");
        assert_eq!(bare.name, "Web Design");
        assert!(bare.description.is_empty());
    }

    #[test]
    fn flags_require_a_business_name_without_input_file() {
        let result = build_requirements(
            None, None, None, None, None,
            vec![], vec![], vec![], vec![],
        );
        assert!(result.is_err());
    }

    #[test]
    fn flags_assemble_requirements() {
        let requirements = build_requirements(
            None,
            Some("Aurora Design Studio".into()),
            Some("design studio".into()),
            Some("Portland".into()),
            None,
            vec!["Home".into(), "Contact".into()],
            vec!["Brand Identity: logos".into()],
            vec!["minimal".into()],
            vec![],
        )
        .unwrap();

        assert_eq!(requirements.business_name, "Aurora Design Studio");
        assert_eq!(requirements.pages, vec!["Home", "Contact"]);
        assert_eq!(requirements.services.len(), 1);
        assert_eq!(requirements.style_keywords, vec!["minimal"]);
    }

    #[test]
    fn tilde_expansion_only_touches_the_prefix() {
        let expanded = expand_tilde("~/siteforge-bundles");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
    }
}
