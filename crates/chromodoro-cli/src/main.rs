use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;
mod common;
mod notifier;

#[derive(Parser)]
#[command(name = "chromodoro", version, about = "Chromodoro CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Color-matching game
    Game {
        #[command(subcommand)]
        action: commands::game::GameAction,
    },
    /// Pomodoro focus sessions
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Lifetime statistics
    Stats,
    /// Preference management
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
    /// Apply the daily streak advance for this app open
    Streak,
    /// Data management
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Game { action } => commands::game::run(action),
        Commands::Focus { action } => commands::focus::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Stats => commands::stats::run(),
        Commands::Prefs { action } => commands::prefs::run(action),
        Commands::Streak => commands::streak::run(),
        Commands::Data { action } => commands::data::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "chromodoro",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
