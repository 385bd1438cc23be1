//! Siteforge - AI website rebuilder.
//!
//! Analyzes an existing website, collects design preferences, generates a
//! modern replacement and lets you refine it in a chat.

#![allow(clippy::single_match_else)]

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use siteforge::analysis::SavedAnalysis;
use siteforge::core::{Config, Theme};
use siteforge::pipeline::{event_channel, AnalysisInput, Pipeline, PipelineEvent};
use siteforge::preferences::{Advance, PreferenceCompiler, SelectionStep, UserPreferences};
use siteforge::{DesignProvider, EncodedImage};

/// AI website rebuilder
#[derive(Parser)]
#[command(name = "siteforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an existing website
    Analyze {
        /// URL of the website
        #[arg(long, conflicts_with = "images")]
        url: Option<String>,

        /// Screenshots of the website
        #[arg(required_unless_present = "url")]
        images: Vec<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Save the analysis for `build --from`
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Rebuild a website
    Build {
        /// URL of the website
        #[arg(long, conflicts_with_all = ["images", "from"])]
        url: Option<String>,

        /// Screenshots of the website
        #[arg(required_unless_present_any = ["url", "from"], conflicts_with = "from")]
        images: Vec<PathBuf>,

        /// Reuse an analysis saved with `analyze --save`
        #[arg(long)]
        from: Option<PathBuf>,

        /// Skip preferences and use the legacy generation protocol
        #[arg(long)]
        legacy: bool,

        /// Design vibe
        #[arg(long)]
        vibe: Option<String>,

        /// Color palette
        #[arg(long)]
        palette: Option<String>,

        /// Typography style
        #[arg(long)]
        typography: Option<String>,

        /// Layout focus
        #[arg(long)]
        layout: Option<String>,

        /// Directory to export the website to
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Exit after the first export instead of opening the chat
        #[arg(long)]
        no_chat: bool,
    },

    /// List the design options for every preference step
    Options,

    /// Show or change the card theme
    Theme {
        /// dark, light or toggle
        mode: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Preferences given on the command line, by step.
struct PresetPreferences([Option<String>; 4]);

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    // API keys may live in a local .env
    let _ = dotenvy::dotenv();

    match cli.command {
        Commands::Analyze { url, images, format, save } => {
            cmd_analyze(url, &images, &format, save.as_deref())?;
        }
        Commands::Build {
            url,
            images,
            from,
            legacy,
            vibe,
            palette,
            typography,
            layout,
            out,
            no_chat,
        } => {
            let input = resolve_input(url, &images, from.as_deref())?;
            let presets = PresetPreferences([vibe, palette, typography, layout]);
            cmd_build(input, legacy, &presets, out, no_chat)?;
        }
        Commands::Options => {
            cmd_options();
        }
        Commands::Theme { mode } => {
            cmd_theme(mode.as_deref())?;
        }
        Commands::Config { path } => {
            cmd_config(path)?;
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

/// Build the configured design provider.
#[cfg(feature = "ai")]
fn make_provider(config: &Config) -> Result<Arc<dyn DesignProvider>> {
    use siteforge::GeminiProvider;

    match config.ai.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiProvider::from_config(&config.ai)?)),
        other => anyhow::bail!("Unsupported AI provider: {other}. Supported: gemini"),
    }
}

#[cfg(not(feature = "ai"))]
fn make_provider(_config: &Config) -> Result<Arc<dyn DesignProvider>> {
    anyhow::bail!("Siteforge was built without the `ai` feature")
}

/// Turn command-line sources into an analysis input.
fn resolve_input(
    url: Option<String>,
    images: &[PathBuf],
    saved: Option<&Path>,
) -> Result<AnalysisInput> {
    if let Some(path) = saved {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let saved: SavedAnalysis = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a saved analysis", path.display()))?;
        return Ok(AnalysisInput::Saved { analysis: saved.analysis, data: saved.analysis_data });
    }

    if let Some(url) = url {
        return Ok(AnalysisInput::Url(url));
    }

    let images = images
        .iter()
        .map(|path| {
            EncodedImage::from_path(path).with_context(|| format!("Failed to load {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(AnalysisInput::Images(images))
}

/// Print pipeline events as they arrive.
async fn print_events(mut rx: UnboundedReceiver<PipelineEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            PipelineEvent::Analysis { percent, status } => println!("[{percent:>3}%] {status}"),
            PipelineEvent::Progress(line) => println!("  > {line}"),
            PipelineEvent::MoodImage(_) => println!("  (mood image ready)"),
            PipelineEvent::StepChanged { .. }
            | PipelineEvent::Message(_)
            | PipelineEvent::DocumentUpdated => {}
        }
    }
}

/// Analyze a website and print the result.
fn cmd_analyze(
    url: Option<String>,
    images: &[PathBuf],
    format: &str,
    save: Option<&Path>,
) -> Result<()> {
    let input = resolve_input(url, images, None)?;
    let config = Config::load()?;
    let provider = make_provider(&config)?;

    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let (sink, rx) = event_channel();
        let quiet = format == "json";
        let printer = (!quiet).then(|| tokio::spawn(print_events(rx)));

        let pipeline = Pipeline::new(provider, config.pacing()).with_events(sink);
        let saved = run_analysis(pipeline, input).await;

        // The pipeline is gone, so the stream ends once its events are printed.
        if let Some(printer) = printer {
            let _ = printer.await;
        }
        let saved = saved?;

        match format {
            "json" => println!("{}", serde_json::to_string_pretty(&saved)?),
            _ => {
                println!();
                for line in saved.analysis.summary_lines() {
                    println!("{line}");
                }
            }
        }

        if let Some(path) = save {
            std::fs::write(path, serde_json::to_string_pretty(&saved)?)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !quiet {
                println!("\nSaved analysis to {}", path.display());
            }
        }

        Ok(())
    })
}

/// Run the full rebuild pipeline.
fn cmd_build(
    input: AnalysisInput,
    legacy: bool,
    presets: &PresetPreferences,
    out: Option<PathBuf>,
    no_chat: bool,
) -> Result<()> {
    let config = Config::load()?;
    let provider = make_provider(&config)?;
    let out_dir = out.unwrap_or_else(|| config.export.output_dir.clone());

    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let (sink, rx) = event_channel();
        let printer = tokio::spawn(print_events(rx));

        let pipeline = Pipeline::new(provider, config.pacing()).with_events(sink);
        let result = run_build(pipeline, input, legacy, presets, &out_dir, no_chat).await;

        let _ = printer.await;
        result
    })
}

async fn run_analysis(mut pipeline: Pipeline, input: AnalysisInput) -> Result<SavedAnalysis> {
    pipeline.analyze(input).await?;

    let Some(analysis) = pipeline.analysis().cloned() else {
        anyhow::bail!("Analysis produced no result");
    };
    Ok(SavedAnalysis { analysis, analysis_data: pipeline.analysis_data().cloned() })
}

/// Drive one pipeline from analysis to export and chat. Consumes the
/// pipeline so its event stream closes on every exit path.
async fn run_build(
    mut pipeline: Pipeline,
    input: AnalysisInput,
    legacy: bool,
    presets: &PresetPreferences,
    out_dir: &Path,
    no_chat: bool,
) -> Result<()> {
    pipeline.analyze(input).await?;

    if let Some(analysis) = pipeline.analysis() {
        println!();
        for line in analysis.summary_lines() {
            println!("{line}");
        }
    }

    if legacy || pipeline.analysis_data().is_none() {
        println!("\nGenerating with the legacy protocol...");
        pipeline.generate_legacy().await?;
    } else {
        let preferences = {
            let mut compiler = pipeline.begin_preferences()?;
            collect_preferences(&mut compiler, presets).await?
        };
        let Some(preferences) = preferences else {
            pipeline.reset();
            println!("Preference selection cancelled.");
            return Ok(());
        };
        println!("\nCompiling your design...");
        pipeline.generate_with_preferences(preferences).await?;
    }

    let path = pipeline.export(out_dir)?;
    println!("\nSaved website to {}", path.display());

    if !no_chat {
        chat_loop(&mut pipeline, out_dir).await?;
    }

    Ok(())
}

/// Walk the preference steps, prompting for anything not preset.
///
/// Returns `None` when the user backs out of the first step.
async fn collect_preferences(
    compiler: &mut PreferenceCompiler,
    presets: &PresetPreferences,
) -> Result<Option<UserPreferences>> {
    // Once the user goes back, every step is asked explicitly.
    let mut use_presets = true;

    loop {
        let step = compiler.current_step();
        let preset = presets.0[step.index()].clone().filter(|_| use_presets);

        let value = match preset {
            Some(value) => value,
            None => match prompt_option(step, compiler.selection(step))? {
                Some(value) => value,
                None => {
                    use_presets = false;
                    if compiler.back() {
                        continue;
                    }
                    return Ok(None);
                }
            },
        };

        let selection = compiler.select_option(step, &value).await?;
        if let Advance::Complete(preferences) = selection.advance {
            return Ok(Some(preferences));
        }
    }
}

/// Ask for one option of `step`. `None` means "go back".
fn prompt_option(step: SelectionStep, current: Option<&str>) -> Result<Option<String>> {
    let options = step.options();

    println!("\n{} ({}/{})", step.title(), step.index() + 1, SelectionStep::ALL.len());
    println!("{}", step.subtitle());
    for (i, option) in options.iter().enumerate() {
        let marker = if current == Some(option.value) { "*" } else { " " };
        println!(" {marker}{}. {:<24} {}", i + 1, option.label, option.description);
    }

    let stdin = io::stdin();
    loop {
        print!("Choose [1-{}, b=back]: ", options.len());
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            anyhow::bail!("Input closed before all preferences were chosen");
        }
        let input = input.trim();

        if input.eq_ignore_ascii_case("b") {
            return Ok(None);
        }
        if let Some(option) =
            input.parse::<usize>().ok().and_then(|n| n.checked_sub(1)).and_then(|i| options.get(i))
        {
            return Ok(Some(option.value.to_string()));
        }
        if step.has_option(input) {
            return Ok(Some(input.to_string()));
        }

        println!("Invalid choice: {input}");
    }
}

/// Chat with the design model about the generated site.
async fn chat_loop(pipeline: &mut Pipeline, out_dir: &Path) -> Result<()> {
    if let Some(welcome) = pipeline.messages().last() {
        println!("\n{}", welcome.text);
    }
    println!("Describe a change, or use /html, /export, /quit.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        match input.trim() {
            "" => {}
            "/quit" | "/exit" => break,
            "/html" => println!("{}", pipeline.html().unwrap_or_default()),
            "/export" => {
                let path = pipeline.export(out_dir)?;
                println!("Saved website to {}", path.display());
            }
            instruction => {
                if let Err(e) = pipeline.refine(instruction).await {
                    tracing::debug!(error = %e, "Refinement rejected");
                }
                if let Some(reply) = pipeline.messages().last() {
                    println!("{}", reply.text);
                }
            }
        }
    }

    let path = pipeline.export(out_dir)?;
    println!("Saved website to {}", path.display());
    Ok(())
}

/// Print every selection step and its options.
fn cmd_options() {
    for step in SelectionStep::ALL {
        println!("{} [{}]", step.title(), step.id());
        for option in step.options() {
            println!("  {:<24} {}", option.value, option.description);
        }
        println!();
    }
}

/// Show or persist the card theme.
fn cmd_theme(mode: Option<&str>) -> Result<()> {
    let mut config = Config::load()?;

    let Some(mode) = mode else {
        println!("{}", config.ui.theme);
        return Ok(());
    };

    config.ui.theme = match mode {
        "toggle" => config.ui.theme.toggled(),
        other => other.parse::<Theme>().map_err(anyhow::Error::msg)?,
    };
    let path = config.save()?;
    tracing::debug!(path = %path.display(), "Saved config");
    println!("{}", config.ui.theme);

    Ok(())
}

/// Show configuration.
fn cmd_config(show_path: bool) -> Result<()> {
    if show_path {
        if let Some(path) = Config::global_config_path() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let config = Config::load()?;
    let toml = toml::to_string_pretty(&config)?;
    println!("{toml}");

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "siteforge", &mut io::stdout());
}
