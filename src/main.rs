// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info, warn};
use std::io::Write;
use std::path::Path;

use mtengines::app_config::{self, Config, EngineKind};
use mtengines::engine_factory::{create_engine, create_llm_engine};
use mtengines::{MtEngine, TerminologyPair, parse_element};

/// CLI Wrapper for EngineKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliEngine {
    Azure,
    Google,
    Yandex,
    #[value(name = "deepl")]
    DeepL,
    #[value(name = "modernmt")]
    ModernMT,
    #[value(name = "chatgpt")]
    ChatGPT,
    Anthropic,
    Alibaba,
    Mistral,
}

impl From<CliEngine> for EngineKind {
    fn from(cli_engine: CliEngine) -> Self {
        match cli_engine {
            CliEngine::Azure => EngineKind::Azure,
            CliEngine::Google => EngineKind::Google,
            CliEngine::Yandex => EngineKind::Yandex,
            CliEngine::DeepL => EngineKind::DeepL,
            CliEngine::ModernMT => EngineKind::ModernMT,
            CliEngine::ChatGPT => EngineKind::ChatGPT,
            CliEngine::Anthropic => EngineKind::Anthropic,
            CliEngine::Alibaba => EngineKind::Alibaba,
            CliEngine::Mistral => EngineKind::Mistral,
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate text, or an XLIFF <source> element with --xml
    Translate(TranslateArgs),

    /// List the source and target languages of the engine
    Languages,

    /// List the models of a chat model engine
    Models,

    /// Generate shell completions for mtengines
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Text to translate
    #[arg(value_name = "TEXT")]
    text: String,

    /// Treat TEXT as an XLIFF <source> element and print the <target>
    #[arg(long)]
    xml: bool,

    /// Terminology pair applied with --xml, written as SOURCE=TARGET
    #[arg(long = "term", value_name = "SOURCE=TARGET", requires = "xml")]
    terms: Vec<String>,
}

/// mtengines - machine translation engines behind one contract
///
/// Translates text and XLIFF segments with REST translation services
/// (Azure, Google, Yandex, DeepL, ModernMT) and chat models
/// (ChatGPT, Anthropic, Alibaba, Mistral).
#[derive(Parser, Debug)]
#[command(name = "mtengines")]
#[command(version)]
#[command(about = "Machine translation through REST services and chat models")]
#[command(long_about = "mtengines sends text or XLIFF segments to a machine translation engine.

EXAMPLES:
    mtengines translate \"Hello world\"                        # Translate using default config
    mtengines -e google -s en -t de translate \"Hello\"         # Use a specific engine and pair
    mtengines -e anthropic translate --xml '<source>Hi</source>' # Generate a <target> element
    mtengines -e deepl languages                              # List supported languages
    mtengines -e mistral models                               # List available models
    mtengines completions bash > mtengines.bash               # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Engine to use
    #[arg(short, long, value_enum, global = true)]
    engine: Option<CliEngine>,

    /// Model name, for chat model engines
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Source language code (e.g., 'en', 'pt-BR')
    #[arg(short, long, global = true)]
    source_language: Option<String>,

    /// Target language code (e.g., 'fr', 'zh-Hans')
    #[arg(short, long, global = true)]
    target_language: Option<String>,

    /// API key for the engine, overriding the configuration
    #[arg(long, env = "MTENGINES_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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
            let color = Self::color_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:5} {}\x1B[0m",
                color, now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at trace so the configured level can be applied with set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "mtengines", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level((&config.log_level).into());

    match &cli.command {
        Commands::Translate(args) => run_translate(&config, args).await,
        Commands::Languages => run_languages(&config).await,
        Commands::Models => run_models(&config).await,
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load or create the configuration, then apply command line overrides
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    if let Some(engine) = &options.engine {
        config.engine = engine.clone().into();
    }

    let engine_kind = config.engine;
    let settings = config.engine_config_mut(engine_kind);
    if let Some(model) = &options.model {
        settings.model = model.clone();
    }
    if let Some(api_key) = &options.api_key {
        settings.api_key = api_key.clone();
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

async fn run_translate(config: &Config, args: &TranslateArgs) -> Result<()> {
    let engine = create_engine(config)?;
    info!(
        "Translating with {} from {} to {}",
        engine.name(), engine.source_language(), engine.target_language()
    );

    if args.xml {
        let source = parse_element(&args.text)
            .context("TEXT is not a well formed XML element")?;
        let terms = args.terms
            .iter()
            .map(|term| parse_term(term))
            .collect::<Result<Vec<_>>>()?;
        let record = engine.get_mt_match(&source, &terms).await?;
        debug!("Match: {}", record.to_json());
        println!("{}", record.target());
    } else {
        let translation = engine.translate(&args.text).await?;
        println!("{}", translation);
    }

    Ok(())
}

fn parse_term(term: &str) -> Result<TerminologyPair> {
    let (source, target) = term
        .split_once('=')
        .ok_or_else(|| anyhow!("Terminology must be written as SOURCE=TARGET: {}", term))?;
    Ok(TerminologyPair::new(source.trim(), target.trim()))
}

async fn run_languages(config: &Config) -> Result<()> {
    let engine = create_engine(config)?;
    let sources = engine.source_languages().await?;
    let targets = engine.target_languages().await?;

    println!("Source languages ({}): {}", sources.len(), sources.join(", "));
    println!("Target languages ({}): {}", targets.len(), targets.join(", "));
    Ok(())
}

async fn run_models(config: &Config) -> Result<()> {
    if !config.engine.is_llm() {
        return Err(anyhow!("{} does not use models", config.engine.display_name()));
    }
    let settings = config.get_active_engine_config()
        .ok_or_else(|| anyhow!("No settings found for engine {}", config.engine))?;
    let engine = create_llm_engine(config.engine, settings)?;

    for model in engine.available_models().await? {
        println!("{}\t{}", model.id, model.display_name);
    }
    Ok(())
}
