use std::sync::Arc;

use clap::Parser;
use poem::{Server, listener::TcpListener};

use assistly_backend::app_data::AppData;
use assistly_backend::build_app;
use assistly_backend::cli::{self, Cli, Commands};
use assistly_backend::config::{BootstrapSettings, DatabaseConnections, SecretManager, init_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();

    // Step 1: Load settings and secrets (fail fast on misconfiguration)
    let bootstrap_settings = BootstrapSettings::from_env()?;
    tracing::debug!("Bootstrap settings loaded: {:?}", bootstrap_settings);

    let secret_manager = Arc::new(SecretManager::init(bootstrap_settings.backend())?);
    tracing::debug!("Secret manager initialized: {}", secret_manager);

    // Step 2: Connect and migrate local databases
    let connections = DatabaseConnections::connect(&bootstrap_settings).await?;
    connections.migrate().await?;
    tracing::info!("Database migrations completed");

    // Step 3: Build shared application data
    let app_data = Arc::new(AppData::init(&bootstrap_settings, connections, secret_manager)?);

    // Step 4: Run a CLI command or serve
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&bootstrap_settings, app_data).await?,
        command => cli::execute_command(command, app_data).await?,
    }

    Ok(())
}

async fn serve(bootstrap_settings: &BootstrapSettings, app_data: Arc<AppData>) -> Result<(), std::io::Error> {
    let address = bootstrap_settings.server_address();
    let server_url = format!("http://localhost:{}", bootstrap_settings.server_port());

    let app = build_app(app_data, &server_url);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at {}/swagger", server_url);

    Server::new(TcpListener::bind(address)).run(app).await
}
