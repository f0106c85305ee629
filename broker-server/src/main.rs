use broker_server::{Config, PrintBroker, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv, logging)
    setup_environment();

    tracing::info!("print broker starting...");

    // 2. Configuration
    let config = Config::from_env();

    // 3. Start the HTTP listener on its own task
    let broker = PrintBroker::new(config, broker_printer::os_spooler());
    let addr = broker.start().await?;
    tracing::info!("listening on http://{addr}");

    // 4. Run until interrupted
    tokio::signal::ctrl_c().await?;
    broker.stop().await;

    Ok(())
}
