use anyhow::Context;

use lighthouse::{logging, AppConfig, LighthouseApp};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::default();
    logging::init_logging(config.logging.clone());

    log::info!("Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let app = LighthouseApp::new(config).context("failed to start lighthouse viewer")?;
    app.run()
}
