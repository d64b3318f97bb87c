use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "moodflix")]
#[command(about = "MoodFlix CLI - movie recommendations from your facial expression", long_about = None)]
struct Cli {
    /// Config file (defaults to the per-user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to the authentication backend
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MOODFLIX_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account, then sign in with it
    Signup {
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "MOODFLIX_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    /// Run the capture loop against a recorded detection stream
    Capture {
        /// JSON Lines file, one array of face detections per frame
        #[arg(long)]
        replay: PathBuf,
        /// Restart the recording when it runs out
        #[arg(long = "loop")]
        looping: bool,
        /// Stop after this many seconds (runs until Ctrl-C otherwise)
        #[arg(long)]
        duration_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let app = commands::App::bootstrap(cli.config).await?;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&app, &email, &password).await?,
        Commands::Signup {
            firstname,
            lastname,
            email,
            password,
        } => commands::auth::signup(&app, firstname, lastname, email, password).await?,
        Commands::Logout => commands::auth::logout(&app).await?,
        Commands::Status => commands::status::show(&app)?,
        Commands::Capture {
            replay,
            looping,
            duration_secs,
        } => commands::capture::run(&app, &replay, looping, duration_secs).await?,
    }

    Ok(())
}
