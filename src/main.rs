use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use revline_core::{ErrorPolicy, OutputFormat, RevlineConfig, SuggestionStatus};
use revline_difflens::filter::ChangeFilter;
use revline_review::analyzer::ChangeAnalyzer;
use revline_review::llm::LlmClient;
use revline_review::report;

const CONFIG_FILE: &str = ".revline.toml";

#[derive(Parser)]
#[command(
    name = "revline",
    version,
    about = "Line-by-line AI review of uncommitted changes",
    long_about = "revline sends every line added in your working tree to an LLM and collects\n\
                   the feedback into a markdown report (code_review_report.md).\n\n\
                   Examples:\n  \
                     revline review                       Review uncommitted changes in .\n  \
                     revline review --repo ../service     Review another repository\n  \
                     git diff main | revline review --diff-file -   Review a diff from stdin\n  \
                     revline init                         Create a .revline.toml config file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .revline.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format for stdout (markdown or json)
    #[arg(long, global = true, default_value = "markdown")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Review the uncommitted changes of a repository
    #[command(long_about = "Review the uncommitted changes of a repository.\n\n\
        Runs `git diff` in the repository, sends each added line to the configured\n\
        chat completion endpoint and prints the markdown report. The report is also\n\
        written to code_review_report.md in the current directory.\n\n\
        Examples:\n  revline review --repo .\n  \
        revline review --concurrency 4 --on-error skip\n  \
        revline review --diff-file changes.patch --no-write")]
    Review {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Read the diff from a file ('-' for stdin) instead of running git
        #[arg(long)]
        diff_file: Option<PathBuf>,
        /// Where to write the report (default: code_review_report.md)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Print the report without writing it to disk
        #[arg(long)]
        no_write: bool,
        /// Model to use (overrides [llm] model)
        #[arg(long)]
        model: Option<String>,
        /// Maximum number of requests in flight
        #[arg(long)]
        concurrency: Option<usize>,
        /// What to do when one line cannot be reviewed: fail or skip
        #[arg(long)]
        on_error: Option<ErrorPolicy>,
        /// Additional glob patterns for files to leave out (e.g. "*.lock")
        #[arg(long)]
        skip_pattern: Vec<String>,
    },
    /// Create a default .revline.toml configuration file
    #[command(long_about = "Create a default .revline.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .revline.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!("revline v{version}: line-by-line AI review of uncommitted changes\n");

    println!("Quick start:");
    println!("  revline init                  Create a .revline.toml config file");
    println!("  revline review                Review uncommitted changes in the current repo");
    println!("  revline review --repo <path>  Review another repository\n");

    println!("Run 'revline <command> --help' for details.");
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "revline=debug,revline_core=debug,revline_difflens=debug,revline_review=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<RevlineConfig> {
    let config = match explicit {
        Some(path) => RevlineConfig::from_file(path)?,
        None => {
            let default_path = Path::new(CONFIG_FILE);
            if default_path.exists() {
                RevlineConfig::from_file(default_path)?
            } else {
                RevlineConfig::default()
            }
        }
    };
    Ok(config)
}

fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template("{spinner} reviewing {pos}/{len} lines [{elapsed}]")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

const DEFAULT_CONFIG: &str = r#"# revline configuration

[llm]
# Any OpenAI-compatible chat completions endpoint
# model = "gpt-4-turbo"
# base_url = "https://api.openai.com"
# api_key_env = "OPENAI_API_KEY"
# temperature = 0.2
# timeout_secs = 120
# max_retries = 2

[review]
# concurrency = 1
# on_error = "fail"        # or "skip" to keep going with a placeholder
# skip_patterns = ["*.lock", "vendor/**"]
# output = "code_review_report.md"
"#;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        None => {
            print_welcome();
        }
        Some(Command::Review {
            ref repo,
            ref diff_file,
            ref output,
            no_write,
            ref model,
            concurrency,
            on_error,
            ref skip_pattern,
        }) => {
            let config = load_config(cli.config.as_deref())?;

            // Apply CLI overrides
            let mut llm_config = config.llm.clone();
            if let Some(model) = model {
                llm_config.model = model.clone();
            }
            let mut review_config = config.review.clone();
            if let Some(n) = concurrency {
                review_config.concurrency = n;
            }
            if let Some(policy) = on_error {
                review_config.on_error = policy;
            }
            review_config
                .skip_patterns
                .extend(skip_pattern.iter().cloned());
            if let Some(path) = output {
                review_config.output = path.clone();
            }

            let diff = match diff_file {
                Some(path) => revline_difflens::source::read_diff_file(path)
                    .wrap_err(format!("reading diff from {}", path.display()))?,
                None => revline_difflens::source::working_tree_diff(repo)?,
            };

            let records = revline_difflens::extract_changes(&diff);
            let filtered = ChangeFilter::from_config(&review_config).filter(records);
            for skipped in &filtered.skipped {
                debug!(
                    file = %skipped.path.display(),
                    pattern = %skipped.pattern,
                    lines = skipped.lines,
                    "skipping file"
                );
            }
            let records = filtered.kept;

            let suggestions = if records.is_empty() {
                info!("no added lines to review");
                Vec::new()
            } else {
                let llm_config = llm_config.with_resolved_api_key()?;
                let client = LlmClient::new(&llm_config)?;
                let analyzer = ChangeAnalyzer::new(client, &review_config)
                    .with_progress(progress_bar(records.len()));
                analyzer.analyze(&records).await?
            };

            let report = report::build_report(&suggestions);

            if cli.verbose {
                let failed = suggestions
                    .iter()
                    .filter(|s| s.status == SuggestionStatus::Failed)
                    .count();
                eprintln!("--- Review Stats ---");
                eprintln!(
                    "Model: {} | Lines reviewed: {} | Failed: {} | Files skipped: {}",
                    llm_config.model,
                    suggestions.len(),
                    failed,
                    filtered.skipped.len(),
                );
                eprintln!("--------------------");
            }

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&suggestions).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => {
                    println!("{report}");
                }
            }

            if !no_write {
                report::write_report(&review_config.output, &report).wrap_err(format!(
                    "writing report to {}",
                    review_config.output.display()
                ))?;
                debug!(path = %review_config.output.display(), "report written");
            }
        }
        Some(Command::Init) => {
            let path = Path::new(CONFIG_FILE);
            if path.exists() {
                miette::bail!("{} already exists", CONFIG_FILE);
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created {CONFIG_FILE} with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "revline", &mut std::io::stdout());
        }
    }

    Ok(())
}
