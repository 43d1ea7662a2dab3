//! Credential Service - administrative CLI for user credentials.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use common::{init_tracing, AppError, AppResult, OptionExt};
use credential_service_lib::config::CredentialServiceConfig;
use credential_service_lib::service::CredentialService;
use credential_service_lib::MigrateAction;
use domain::User;

#[derive(Parser)]
#[command(name = "credential-service")]
#[command(about = "User credential management")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user
    Register {
        #[arg(long)]
        username: String,
        #[arg(long, env = "CREDENTIAL_PASSWORD")]
        password: String,
        #[arg(long, env = "CREDENTIAL_PASSWORD_CONFIRM")]
        confirm_password: String,
    },
    /// Change a user's password
    ChangePassword {
        #[arg(long)]
        username: String,
        #[arg(long, env = "CREDENTIAL_OLD_PASSWORD")]
        old_password: String,
        #[arg(long, env = "CREDENTIAL_NEW_PASSWORD")]
        new_password: String,
        #[arg(long, env = "CREDENTIAL_NEW_PASSWORD_CONFIRM")]
        confirm_new_password: String,
    },
    /// Show a stored user
    Show {
        #[arg(long)]
        id: Uuid,
    },
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "Command failed");
            eprintln!("error[{}]: {}", err.code(), err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> AppResult<()> {
    let config = CredentialServiceConfig::from_env();
    tracing::debug!(?config, "Configuration loaded");

    match command {
        Commands::Register {
            username,
            password,
            confirm_password,
        } => {
            let service = credential_service_lib::connect_service(&config).await?;
            let user = service
                .register_user(Some(&username), Some(&password), Some(&confirm_password))
                .await?;
            print_user(&user)?;
        }
        Commands::ChangePassword {
            username,
            old_password,
            new_password,
            confirm_new_password,
        } => {
            let service = credential_service_lib::connect_service(&config).await?;
            let mut user = service.authenticate(&username, &old_password).await?;
            service.change_password(
                &mut user,
                &old_password,
                Some(&new_password),
                Some(&confirm_new_password),
            )?;
            let user = service.store_user(user).await?;
            print_user(&user)?;
        }
        Commands::Show { id } => {
            let service = credential_service_lib::connect_service(&config).await?;
            let user = service.get_user(id).await?.ok_or_not_found()?;
            print_user(&user)?;
        }
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            let status = credential_service_lib::run_migrations(&config, migrate_action).await?;
            for migration in status {
                let marker = if migration.applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, migration.name);
            }
        }
    }

    Ok(())
}

fn print_user(user: &User) -> AppResult<()> {
    let json = serde_json::to_string_pretty(user).map_err(|e| AppError::internal(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
