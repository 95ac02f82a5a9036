// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use termguard::app_config::{self, Config, ProviderKind};
use termguard::glossary::{
    GlossaryImporter, GlossaryStore, JsonGlossaryStore, StatsService, TermMatcher, TermOccurrence,
};
use termguard::providers;
use termguard::translation::{GlossaryPipeline, GlossaryTranslation, TermProtector, TranslateOptions};

/// CLI Wrapper for ProviderKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    Ollama,
    Anthropic,
    Mock,
}

impl From<CliProvider> for ProviderKind {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Ollama => ProviderKind::Ollama,
            CliProvider::Anthropic => ProviderKind::Anthropic,
            CliProvider::Mock => ProviderKind::Mock,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "termguard")]
#[command(version)]
#[command(about = "Glossary-safe machine translation")]
#[command(long_about = "termguard protects glossary terms before machine translation and verifies \
the translator respected them afterwards.

Configuration is read from conf.json by default and created with defaults when missing.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Log level override
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate text while protecting glossary terms
    Translate(TranslateArgs),

    /// List the glossary terms found in a text
    Find(TextArgs),

    /// Show the text as it would be sent to the translator
    Wrap {
        #[command(flatten)]
        text: TextArgs,

        /// Use id-less fences for forbidden and translated terms
        #[arg(long)]
        simple: bool,
    },

    /// Replace translatable terms with their glossary translation
    Replace {
        #[command(flatten)]
        text: TextArgs,

        /// Target language code
        #[arg(short, long)]
        target_language: Option<String>,
    },

    /// Show statistics for a project's glossary
    Stats(ProjectArgs),

    /// List glossary languages, or the provider's languages without a project
    Languages(ProjectArgs),

    /// Look up a single glossary term
    Lookup {
        /// Term to look up
        term: String,

        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Import glossary rows from a JSON array file
    Import {
        /// File containing an array of row objects
        #[arg(value_name = "ROWS_PATH")]
        path: PathBuf,

        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ProjectArgs {
    /// Glossary project (defaults to glossary.default_project)
    #[arg(short, long)]
    project: Option<String>,
}

#[derive(Args, Debug)]
struct TextArgs {
    /// Text to process
    text: String,

    #[command(flatten)]
    project: ProjectArgs,
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Text to translate
    text: String,

    /// Source language code
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code
    #[arg(short, long)]
    target_language: Option<String>,

    #[command(flatten)]
    project: ProjectArgs,

    /// Translation provider to use
    #[arg(long, value_enum)]
    provider: Option<CliProvider>,

    /// Model override for the selected provider
    #[arg(short, long)]
    model: Option<String>,

    /// Do not fence forbidden terms
    #[arg(long)]
    no_preserve_forbidden: bool,

    /// Do not fence translatable terms
    #[arg(long)]
    no_translate_allowed: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and emoji for level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌ "),
            Level::Warn => ("1;33", "🚧 "),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍 "),
            Level::Trace => ("1;35", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, emoji) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set via max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "termguard", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_or_create_config(&cli.config)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    log::set_max_level(config.log_level.into());

    match cli.command {
        Commands::Translate(args) => run_translate(config, args).await,
        Commands::Find(args) => run_find(&config, &args).await,
        Commands::Wrap { text, simple } => run_wrap(&config, &text, simple).await,
        Commands::Replace { text, target_language } => run_replace(&config, &text, target_language).await,
        Commands::Stats(args) => run_stats(&config, &args).await,
        Commands::Languages(args) => run_languages(&config, &args).await,
        Commands::Lookup { term, project } => run_lookup(&config, &term, &project).await,
        Commands::Import { path, project } => run_import(&config, &path, &project).await,
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load the configuration file, writing a default one when it is missing
fn load_or_create_config(config_path: &Path) -> Result<Config> {
    if config_path.exists() {
        return Config::from_file(config_path);
    }

    warn!("Config file not found at '{}', creating default config.", config_path.display());
    let config = Config::default();
    config.save(config_path)?;
    Ok(config)
}

fn glossary_store(config: &Config) -> Arc<dyn GlossaryStore> {
    Arc::new(JsonGlossaryStore::new(&config.glossary.store_path))
}

/// Project from the command line, falling back to the configured default
fn resolve_project(config: &Config, args: &ProjectArgs) -> Option<String> {
    args.project.clone().or_else(|| config.glossary.default_project.clone())
}

fn require_project(config: &Config, args: &ProjectArgs) -> Result<String> {
    resolve_project(config, args)
        .ok_or_else(|| anyhow!("A project is required: pass --project or set glossary.default_project"))
}

async fn find_occurrences(config: &Config, args: &TextArgs) -> Result<Vec<TermOccurrence>> {
    let project_id = require_project(config, &args.project)?;
    let terms = glossary_store(config).get_terms(&project_id).await?;
    Ok(TermMatcher::find(&args.text, &terms))
}

fn protector(config: &Config) -> Result<TermProtector> {
    let fence = termguard::translation::FenceFormat::new(&config.glossary.fence_tag)
        .with_context(|| format!("Invalid fence tag: {}", config.glossary.fence_tag))?;
    Ok(TermProtector::new(fence))
}

async fn run_translate(mut config: Config, args: TranslateArgs) -> Result<()> {
    // Override config with CLI options if provided
    if let Some(provider) = &args.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &args.model {
        let provider_str = config.translation.provider.to_lowercase_string();
        match config
            .translation
            .available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider_str)
        {
            Some(provider_config) => provider_config.model = model.clone(),
            None => {
                let mut provider_config = app_config::ProviderConfig::new(config.translation.provider);
                provider_config.model = model.clone();
                config.translation.available_providers.push(provider_config);
            }
        }
    }
    if let Some(source_lang) = &args.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &args.target_language {
        config.target_language = target_lang.clone();
    }

    config.validate().context("Configuration validation failed")?;

    let provider = providers::create_provider(&config.translation)?;
    info!(
        "Translating {} -> {} with {} ({})",
        config.source_language,
        config.target_language,
        config.translation.provider.display_name(),
        config.translation.get_model()
    );

    let pipeline = GlossaryPipeline::with_fence_tag(glossary_store(&config), provider, &config.glossary.fence_tag)?;
    let options = TranslateOptions {
        preserve_forbidden_terms: config.glossary.preserve_forbidden_terms && !args.no_preserve_forbidden,
        translate_allowed_terms: config.glossary.translate_allowed_terms && !args.no_translate_allowed,
    };
    let project_id = resolve_project(&config, &args.project);
    debug!("Using glossary project: {:?}", project_id);

    let result = pipeline
        .translate_with_glossary(
            &args.text,
            &config.source_language,
            &config.target_language,
            project_id.as_deref(),
            options,
        )
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_translation(&result);
    }
    Ok(())
}

fn print_translation(result: &GlossaryTranslation) {
    println!("{}", result.translated_text);

    let verification = &result.verification_results;
    eprintln!();
    eprintln!(
        "Glossary terms: {} found, {} fenced, compliance: {}",
        result.glossary_terms_found.len(),
        verification.term_checks.len(),
        if verification.success { "ok" } else { "FAILED" }
    );
    for warning in &verification.warnings {
        eprintln!("  warning: {}", warning);
    }
    for suggestion in &verification.suggestions {
        eprintln!("  suggestion: {}", suggestion);
    }
}

async fn run_find(config: &Config, args: &TextArgs) -> Result<()> {
    let occurrences = find_occurrences(config, args).await?;
    if occurrences.is_empty() {
        println!("No glossary terms found");
        return Ok(());
    }

    for occurrence in &occurrences {
        let mut flags = Vec::new();
        if occurrence.forbidden {
            flags.push("forbidden");
        }
        if occurrence.translatable {
            flags.push("translatable");
        }
        if occurrence.case_sensitive {
            flags.push("case-sensitive");
        }
        println!(
            "{:>5}-{:<5} {:<24} {}",
            occurrence.start,
            occurrence.end,
            occurrence.matched_text,
            flags.join(", ")
        );
    }
    Ok(())
}

async fn run_wrap(config: &Config, args: &TextArgs, simple: bool) -> Result<()> {
    let occurrences = find_occurrences(config, args).await?;
    let protector = protector(config)?;

    let wrapped = if simple {
        protector.wrap_simple(&args.text, &occurrences)
    } else {
        protector.wrap(
            &args.text,
            &occurrences,
            config.glossary.preserve_forbidden_terms,
            config.glossary.translate_allowed_terms,
        )
    };
    println!("{}", wrapped);
    Ok(())
}

async fn run_replace(config: &Config, args: &TextArgs, target_language: Option<String>) -> Result<()> {
    let target_language = target_language.unwrap_or_else(|| config.target_language.clone());
    termguard::language_utils::validate_language_code(&target_language)?;

    let occurrences = find_occurrences(config, args).await?;
    println!("{}", protector(config)?.replace_terms(&args.text, &occurrences, &target_language));
    Ok(())
}

async fn run_stats(config: &Config, args: &ProjectArgs) -> Result<()> {
    let project_id = require_project(config, args)?;
    let stats = StatsService::new(glossary_store(config)).get_stats(&project_id).await?;

    println!("Glossary statistics for '{}':", project_id);
    println!("  Total terms:        {}", stats.total_terms);
    println!("  Case-sensitive:     {}", stats.case_sensitive_terms);
    println!("  Case-insensitive:   {}", stats.case_insensitive_terms);
    println!("  Forbidden:          {}", stats.forbidden_terms);
    println!("  Translatable:       {}", stats.translatable_terms);
    println!(
        "  Languages ({}):     {}",
        stats.language_count,
        stats.available_languages.join(", ")
    );
    Ok(())
}

async fn run_languages(config: &Config, args: &ProjectArgs) -> Result<()> {
    let Some(project_id) = resolve_project(config, args) else {
        let provider = providers::create_provider(&config.translation)?;
        for (code, name) in provider.supported_languages() {
            println!("{:<8} {}", code, name);
        }
        return Ok(());
    };

    let languages = StatsService::new(glossary_store(config))
        .get_available_languages(&project_id)
        .await?;
    for code in languages {
        println!("{:<8} {}", code, termguard::language_utils::display_name(&code));
    }
    Ok(())
}

async fn run_lookup(config: &Config, term: &str, args: &ProjectArgs) -> Result<()> {
    let project_id = require_project(config, args)?;
    match StatsService::new(glossary_store(config))
        .lookup_term(term, &project_id)
        .await?
    {
        Some(info) => println!("{}", serde_json::to_string_pretty(&info)?),
        None => println!("Term '{}' not found in project '{}'", term, project_id),
    }
    Ok(())
}

async fn run_import(config: &Config, path: &Path, args: &ProjectArgs) -> Result<()> {
    let project_id = require_project(config, args)?;
    let store = JsonGlossaryStore::new(&config.glossary.store_path);

    let existing = store
        .load_all()
        .await?
        .remove(&project_id)
        .unwrap_or_default();
    let rows = GlossaryImporter::load_rows(path).await?;
    let report = GlossaryImporter::parse_rows(&rows, &existing)?;

    for name in &report.skipped {
        warn!("Skipping existing term '{}'", name);
    }
    let added = store.add_terms(&project_id, report.terms).await?;
    info!(
        "Imported {} term(s) into '{}' ({} skipped, languages: {})",
        added,
        project_id,
        report.skipped.len(),
        report.languages.join(", ")
    );
    Ok(())
}
