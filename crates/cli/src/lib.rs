use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sdui_cache::{generate_key_bytes, CacheStats};
use sdui_parser::{DescriptorParser, ParserConfig, ParserMetrics};
use sdui_protocol::{AssetSource, ComponentDescriptor};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

mod assets;
mod report;

pub use assets::DirAssetSource;
pub use report::{render_outline, StyleSummary};

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "sdui")]
#[command(about = "Parse and inspect server-driven UI layout documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Descriptor cache capacity (overrides SDUI_CACHE_CAPACITY)
    #[arg(long, global = true)]
    cache_capacity: Option<usize>,

    /// Disable the descriptor cache
    #[arg(long, global = true)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse named layout documents from an asset directory
    Parse(ParseArgs),

    /// Print the cache key of a document (SHA-256 of its exact bytes)
    Key(KeyArgs),

    /// Print the JSON Schema of the descriptor output
    Schema,
}

#[derive(Args)]
struct ParseArgs {
    /// Logical asset names, resolved as <assets>/<name>.json
    #[arg(required = true)]
    names: Vec<String>,

    /// Directory holding the layout documents
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Parse every document this many times (later passes hit the cache)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    repeat: u32,
}

#[derive(Args)]
struct KeyArgs {
    /// Read the document from this file instead of stdin
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Outline,
}

#[derive(Serialize)]
struct DocumentReport {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    descriptor: Option<Arc<ComponentDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ParseOutput {
    documents: Vec<DocumentReport>,
    metrics: ParserMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache: Option<CacheStats>,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut config = ParserConfig::from_env();
    if let Some(capacity) = cli.cache_capacity {
        config.cache_capacity = capacity;
    }
    if cli.no_cache {
        config.cache_enabled = false;
    }

    match cli.command {
        Commands::Parse(args) => run_parse(args, config).await?,
        Commands::Key(args) => run_key(args)?,
        Commands::Schema => run_schema()?,
    }

    Ok(())
}

async fn run_parse(args: ParseArgs, config: ParserConfig) -> Result<()> {
    let parser =
        Arc::new(DescriptorParser::new(config).context("Invalid parser configuration")?);
    let source = DirAssetSource::new(&args.assets);
    log::debug!(
        "parsing {} document(s) from {}",
        args.names.len(),
        source.root().display()
    );

    let mut tasks = Vec::with_capacity(args.names.len());
    for name in &args.names {
        let Some(json) = source.load(name) else {
            tasks.push(None);
            continue;
        };
        let parser = Arc::clone(&parser);
        let repeat = args.repeat;
        tasks.push(Some(tokio::spawn(async move {
            let mut first = None;
            for _ in 0..repeat {
                let result = Arc::clone(&parser).parse_async(json.clone()).await;
                if first.is_none() {
                    first = Some(result);
                }
            }
            first
        })));
    }

    let mut documents = Vec::with_capacity(args.names.len());
    for (name, task) in args.names.iter().zip(tasks) {
        let outcome = match task {
            None => Err(format!(
                "asset not found: {}",
                source
                    .path_for(name)
                    .map_or_else(|| name.clone(), |p| p.display().to_string())
            )),
            Some(task) => task
                .await
                .context("parse task failed")?
                .context("no parse runs were scheduled")?
                .map_err(|err| err.to_string()),
        };
        documents.push(match outcome {
            Ok(descriptor) => DocumentReport {
                name: name.clone(),
                descriptor: Some(descriptor),
                error: None,
            },
            Err(error) => {
                log::error!("{name}: {error}");
                DocumentReport {
                    name: name.clone(),
                    descriptor: None,
                    error: Some(error),
                }
            }
        });
    }

    let failed = documents.iter().filter(|doc| doc.error.is_some()).count();
    let output = ParseOutput {
        documents,
        metrics: parser.metrics(),
        cache: parser.cache().map(|cache| cache.stats()),
    };
    log::info!(
        "parsed {} document(s): {} decode(s), {} cache hit(s)",
        output.documents.len(),
        output.metrics.decodes,
        output.metrics.cache_hits
    );

    match args.format {
        OutputFormat::Json => print_stdout(&serde_json::to_string_pretty(&output)?)?,
        OutputFormat::Outline => {
            let mut text = String::new();
            for doc in &output.documents {
                match (&doc.descriptor, &doc.error) {
                    (Some(tree), _) => text.push_str(&render_outline(&doc.name, tree)),
                    (None, Some(error)) => {
                        text.push_str(&format!("# {} (error: {error})\n", doc.name));
                    }
                    (None, None) => {}
                }
            }
            print_stdout(text.trim_end())?;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} document(s) failed", output.documents.len());
    }
    Ok(())
}

fn run_key(args: KeyArgs) -> Result<()> {
    let bytes = match &args.file {
        Some(path) => {
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    print_stdout(generate_key_bytes(&bytes).as_str())
}

fn run_schema() -> Result<()> {
    let schema = sdui_protocol::descriptor_schema();
    print_stdout(&serde_json::to_string_pretty(&schema)?)
}
