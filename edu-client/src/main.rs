use client_core::observability::init_tracing;
use dotenvy::dotenv;
use edu_client::config::get_configuration;
use edu_client::AuthContext;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "edu-session",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    let context = AuthContext::from_settings(&configuration).map_err(|e| {
        tracing::error!("Failed to build API client: {}", e);
        anyhow::anyhow!("Client error: {}", e)
    })?;

    info!(
        base_url = %context.api().base_url(),
        "Checking stored session"
    );

    if context.initialize().await {
        if let Some(user) = context.current_user() {
            info!(
                user_id = %user.id,
                email = %user.email,
                role = %user.role,
                "Session active"
            );
        }
    } else {
        info!("No active session");
    }

    Ok(())
}
