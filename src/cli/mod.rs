// CLI module for operator tasks run against the configured backend

pub mod reconcile;
pub mod staff;
pub mod token;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::app_data::AppData;
use crate::coordinators::{ReconciliationCoordinator, StaffCoordinator};

/// Assistly staff account backend
#[derive(Parser, Debug)]
#[command(name = "assistly")]
#[command(about = "Assistly staff account lifecycle service", long_about = None)]
pub struct Cli {
    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the HTTP server
    Serve,

    /// Staff account management commands
    #[command(subcommand)]
    Staff(StaffCommands),

    /// Report identities and profiles that lost their counterpart
    Reconcile {
        /// Delete profile documents whose identity no longer exists
        #[arg(long)]
        repair: bool,
    },

    /// Operator token commands
    #[command(subcommand)]
    Token(TokenCommands),
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum StaffCommands {
    /// Create a staff account
    Create(CreateStaffArgs),

    /// Delete a staff account
    Delete {
        #[arg(long)]
        uid: String,
    },
}

#[derive(Args, Debug, PartialEq)]
pub struct CreateStaffArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub display_name: String,

    #[arg(long)]
    pub department: String,

    /// A one-time password is generated and printed when omitted
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum TokenCommands {
    /// Issue an admin JWT for calling the staff endpoints
    Issue {
        #[arg(long)]
        subject: String,

        #[arg(long, default_value_t = token::DEFAULT_TTL_MINUTES)]
        ttl_minutes: i64,
    },
}

/// Execute CLI command
///
/// Routes the parsed CLI command to the appropriate handler function.
/// `serve` is handled by main and never reaches here.
///
/// # Arguments
/// * `command` - Parsed CLI command
/// * `app_data` - Application data containing the configured collaborators
///
/// # Returns
/// * `Ok(())` - Command executed successfully
/// * `Err(...)` - Command execution failed
pub async fn execute_command(command: Commands, app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve => {
            return Err("serve is not a CLI command".into());
        }
        Commands::Staff(StaffCommands::Create(args)) => {
            let coordinator = StaffCoordinator::new(app_data);
            staff::create_staff(&coordinator, args).await?;
        }
        Commands::Staff(StaffCommands::Delete { uid }) => {
            let coordinator = StaffCoordinator::new(app_data);
            staff::delete_staff(&coordinator, uid).await?;
        }
        Commands::Reconcile { repair } => {
            let coordinator = ReconciliationCoordinator::new(app_data);
            reconcile::run_reconciliation(&coordinator, repair).await?;
        }
        Commands::Token(TokenCommands::Issue { subject, ttl_minutes }) => {
            token::issue_token(&app_data.token_provider, &app_data.audit_logger, &subject, ttl_minutes).await?;
        }
    }

    Ok(())
}
