//! CLI entry and dispatch.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use expensify_core::SessionManager;
use expensify_core::api::ApiClient;
use expensify_core::config;
use expensify_core::expense::{Category, Period};
use expensify_core::logging;
use expensify_core::store::FileStore;

mod commands;

/// Session manager backed by the on-disk store.
pub(crate) type Manager = SessionManager<FileStore>;

#[derive(Parser)]
#[command(name = "expensify")]
#[command(version)]
#[command(about = "Track expenses from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        /// Password (read from stdin when omitted)
        #[arg(long, env = "EXPENSIFY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account (emails a one-time code unless --legacy)
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Password (read from stdin when omitted)
        #[arg(long, env = "EXPENSIFY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Password confirmation (defaults to the password)
        #[arg(long)]
        confirm: Option<String>,
        /// Register in one step without OTP verification
        #[arg(long)]
        legacy: bool,
    },

    /// Finish signup with the emailed one-time code
    VerifyOtp {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "EXPENSIFY_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        otp: String,
    },

    /// Ask for a new one-time code
    ResendOtp {
        #[arg(long)]
        email: String,
    },

    /// Log out (clear the stored session)
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List and add expenses
    Expenses {
        #[command(subcommand)]
        command: ExpenseCommands,
    },

    /// Spending statistics for a period
    Stats {
        /// daily, weekly, monthly or yearly
        #[arg(long, default_value = "monthly")]
        period: Period,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ExpenseCommands {
    /// Dashboard: total, top categories and recent expenses
    List,
    /// Add an expense
    Add {
        #[arg(long)]
        amount: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "Other")]
        category: Category,
        /// RFC 3339 timestamp (defaults to now)
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },
    /// Show quick-add suggestions and categories
    Suggestions,
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = config::Config::load().context("load config")?;
    let _log_guard = logging::init(&config).context("init logging")?;

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli, &config).await })
}

fn build_manager(config: &config::Config) -> Result<Manager> {
    let api = ApiClient::from_config(config).context("configure API client")?;
    Ok(SessionManager::new(api, FileStore::open_default()))
}

async fn dispatch(cli: Cli, config: &config::Config) -> Result<()> {
    // Config and offline commands must work even when the API settings are broken.
    let manager = || build_manager(config);

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&manager()?, &email, password).await
        }
        Commands::Signup {
            name,
            email,
            password,
            confirm,
            legacy,
        } => {
            let args = commands::auth::SignupArgs {
                name: &name,
                email: &email,
                password,
                confirm,
                legacy,
            };
            commands::auth::signup(&manager()?, args).await
        }
        Commands::VerifyOtp {
            name,
            email,
            password,
            otp,
        } => commands::auth::verify_otp(&manager()?, &name, &email, &password, &otp).await,
        Commands::ResendOtp { email } => commands::auth::resend_otp(&manager()?, &email).await,
        Commands::Logout => commands::auth::logout(&manager()?),
        Commands::Whoami => {
            commands::auth::whoami(&manager()?);
            Ok(())
        }

        Commands::Expenses { command } => match command {
            ExpenseCommands::List => commands::expenses::list(&manager()?).await,
            ExpenseCommands::Add {
                amount,
                description,
                category,
                date,
            } => {
                let form = commands::expenses::AddArgs {
                    amount: &amount,
                    description: &description,
                    category,
                    date,
                };
                commands::expenses::add(&manager()?, form).await
            }
            ExpenseCommands::Suggestions => {
                commands::expenses::suggestions();
                Ok(())
            }
        },

        Commands::Stats { period } => commands::stats::show(&manager()?, period).await,

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
