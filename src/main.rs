//! terminalai - AI-powered terminal command generator.
//!
//! Turns a natural language request into a single shell command using a model
//! hosted on OpenRouter. The command is printed on stdout so the `ai` shell
//! wrapper can put it on the command line; everything else goes to stderr.

mod client;
mod config;
mod context;
mod error;
mod llm;
mod prompt;
mod protocol;
mod setup;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use client::Console;
use config::{ConfigStore, DEFAULT_MODEL};
use context::{Environment, MODEL_VAR};
use llm::OpenRouterClient;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Environment variable with tracing filter directives.
const LOG_VAR: &str = "TERMINALAI_LOG";

const AFTER_HELP: &str = "\
Examples:
  terminalai find all jpg files
  terminalai list files sorted by size
  terminalai show disk usage

Environment variables:
  OPENROUTER_API_KEY    API key (overrides the saved key)
  TERMINALAI_MODEL      Model ID (overrides the saved model)
  TERMINALAI_SHELL      Override detected shell (zsh, bash, fish)
  TERMINALAI_LOG        Log filter, e.g. terminalai=debug";

#[derive(Parser)]
#[command(name = "terminalai")]
#[command(author, about = "AI-powered terminal command generator")]
#[command(long_about = "Turns natural language into a shell command.\n\nRun `terminalai setup` once, then use `ai <query>` in your shell.")]
#[command(after_help = AFTER_HELP)]
#[command(args_conflicts_with_subcommands = true)]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Natural language description of the command you want
    #[arg(value_name = "QUERY", num_args = 1.., trailing_var_arg = true)]
    query: Vec<String>,

    /// Shell syntax to generate (defaults to TERMINALAI_SHELL, then $SHELL)
    #[arg(short = 's', long, value_name = "SHELL")]
    shell: Option<String>,

    /// Log debug information to stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up shell integration (adds the `ai` function)
    Setup {
        /// Install only for this shell instead of asking
        #[arg(long, value_name = "SHELL")]
        shell: Option<String>,
    },
    /// Show and choose the model, or set it directly
    Model {
        /// OpenRouter model ID (e.g. mistralai/devstral-2512:free)
        id: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let env = Environment::capture();

    match cli.command {
        Some(Commands::Setup { shell }) => handle_setup(&env, shell.as_deref()),
        Some(Commands::Model { id }) => handle_model(&env, id),
        None if cli.query.is_empty() => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
        None => handle_query(&env, cli.query.join(" "), cli.shell.as_deref()).await,
    }
}

/// Log to stderr only; stdout is reserved for the generated command.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "terminalai=debug,reqwest=info"
    } else {
        "terminalai=warn,reqwest=warn"
    };
    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Handle the setup command.
fn handle_setup(env: &Environment, shell: Option<&str>) -> Result<()> {
    setup::run(env, shell, &mut Console::stdio(), &mut std::io::stdout())
}

/// Handle the model command: save the given id, or show the current model and
/// let the user pick a new one.
fn handle_model(env: &Environment, id: Option<String>) -> Result<()> {
    let store = ConfigStore::from_environment(env)?;

    let model = match id.filter(|id| !id.trim().is_empty()) {
        Some(id) => id.trim().to_string(),
        None => {
            let current = store.model().unwrap_or_else(|| DEFAULT_MODEL.to_string());
            println!("Current model: {}", current);
            Console::stdio().choose_model()?
        }
    };

    store.save_model(&model)?;
    info!("Saved model to {}", store.path().display());
    println!("Model saved: {}", model);

    if env.model.is_some() {
        eprintln!(
            "Note: {} is set and takes precedence over the saved model.",
            MODEL_VAR
        );
    }
    Ok(())
}

/// Handle query mode: resolve credentials, call the model, print the command.
async fn handle_query(env: &Environment, query: String, shell: Option<&str>) -> Result<()> {
    let shell = env.resolve_shell(shell);
    let store = ConfigStore::from_environment(env)?;

    let api_key = match store.api_key() {
        Some(key) => key,
        None => {
            let key = Console::stdio().prompt_api_key()?;
            store.save_api_key(&key)?;
            eprintln!("\nAPI key saved to {}\n", store.path().display());
            key
        }
    };

    let model = match store.model() {
        Some(model) => model,
        None => {
            let model = Console::stdio().choose_model()?;
            store.save_model(&model)?;
            eprintln!("\nModel saved: {}\n", model);
            model
        }
    };

    debug!("Generating {} command with {}", shell, model);
    let client = OpenRouterClient::new(api_key, model)?;

    match client.generate_command(&query, &shell).await {
        Ok(command) => {
            // Output just the command to stdout
            println!("{}", command);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if matches!(e, error::Error::ModelUnavailable { .. }) {
                print_model_help();
            }
            std::process::exit(1);
        }
    }
}

/// Explain how to switch models after the service rejected one.
fn print_model_help() {
    eprintln!("\nTo change the model, run:");
    eprintln!("  terminalai model\n");
    eprintln!("Or set a custom model:");
    eprintln!("  terminalai model <model-id>\n");
    eprintln!("Find available models at:");
    eprintln!("  https://openrouter.ai/models\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_query_words_are_collected() {
        let cli = Cli::try_parse_from(["terminalai", "find", "all", "jpg", "files"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.query.join(" "), "find all jpg files");
    }

    #[test]
    fn test_query_keeps_hyphenated_words() {
        let cli = Cli::try_parse_from(["terminalai", "list", "files", "-la", "--sorted"]).unwrap();
        assert_eq!(cli.query, ["list", "files", "-la", "--sorted"]);
    }

    #[test]
    fn test_shell_flag_before_query() {
        let cli = Cli::try_parse_from(["terminalai", "--shell", "fish", "show", "path"]).unwrap();
        assert_eq!(cli.shell.as_deref(), Some("fish"));
        assert_eq!(cli.query, ["show", "path"]);
    }

    #[test]
    fn test_setup_subcommand() {
        let cli = Cli::try_parse_from(["terminalai", "setup"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Setup { shell: None })));
    }

    #[test]
    fn test_model_subcommand() {
        let cli = Cli::try_parse_from(["terminalai", "model"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Model { id: None })));

        let cli = Cli::try_parse_from(["terminalai", "model", "foo/bar:free"]).unwrap();
        match cli.command {
            Some(Commands::Model { id }) => assert_eq!(id.as_deref(), Some("foo/bar:free")),
            _ => panic!("expected model subcommand"),
        }
    }

    #[test]
    fn test_no_arguments_means_help() {
        let cli = Cli::try_parse_from(["terminalai"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.query.is_empty());
    }

    #[test]
    fn test_query_may_start_with_help() {
        let cli = Cli::try_parse_from(["terminalai", "help", "me", "find", "big", "files"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.query.join(" "), "help me find big files");
    }

    #[test]
    fn test_version_flag_is_not_reserved() {
        let err = Cli::try_parse_from(["terminalai", "--version"]).err().unwrap();
        assert_ne!(err.kind(), clap::error::ErrorKind::DisplayVersion);

        let cli = Cli::try_parse_from(["terminalai", "--", "-V", "flag", "meaning"]).unwrap();
        assert_eq!(cli.query, ["-V", "flag", "meaning"]);
    }

    #[test]
    fn test_help_flags() {
        for flag in ["--help", "-h"] {
            let err = Cli::try_parse_from(["terminalai", flag]).err().unwrap();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        }
    }
}
