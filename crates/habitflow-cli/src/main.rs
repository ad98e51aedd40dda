use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "habitflow-cli", version, about = "Habitflow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Category management
    Category {
        #[command(subcommand)]
        action: commands::category::CategoryAction,
    },
    /// Mood journal
    Mood {
        #[command(subcommand)]
        action: commands::mood::MoodAction,
    },
    /// Water intake tracking
    Water {
        #[command(subcommand)]
        action: commands::water::WaterAction,
    },
    /// BMI, step and heart-rate calculations
    Health {
        #[command(subcommand)]
        action: commands::health::HealthAction,
    },
    /// Account management
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Reminder scheduling
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Category { action } => commands::category::run(action),
        Commands::Mood { action } => commands::mood::run(action),
        Commands::Water { action } => commands::water::run(action),
        Commands::Health { action } => commands::health::run(action),
        Commands::User { action } => commands::user::run(action),
        Commands::Reminder { action } => commands::reminder::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
