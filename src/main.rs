use payroll_batch::{
    api::{AppState, create_router},
    config::{ConfigLoader, ServerSettings},
    ledger::{PayrollLedger, Roster},
    logging,
    service::PayrollService,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let settings = ServerSettings::from_env()?;
    let loader = ConfigLoader::load(&settings.config_dir)?;
    info!(
        config_dir = %settings.config_dir.display(),
        tax_year = loader.config().settings().tax_year,
        "Tax tables loaded"
    );

    let ledger = match &settings.seed_file {
        Some(path) => {
            let roster = Roster::load(path)?;
            info!(
                seed_file = %path.display(),
                workers = roster.workers.len(),
                timesheets = roster.timesheets.len(),
                "Roster loaded"
            );
            PayrollLedger::from_roster(roster).await?
        }
        None => PayrollLedger::new(),
    };

    let service = PayrollService::from_config(loader.config().clone(), ledger);
    let app = create_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    info!(addr = %settings.bind_addr, "Payroll server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
