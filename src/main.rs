use color_eyre::{Report, Result};
use gl_tut::{config::Config, lifecycle, platform::desktop::DesktopSystem};
use tracing::{error, info};

fn main() -> Result<()> {
    setup_logging()?;

    let config = Config::from_env();

    info!("Starting app");
    if let Err(e) = lifecycle::run(DesktopSystem::default(), &config) {
        println!("{e}");
        error!("{:?}", Report::new(e));
        std::process::exit(-1);
    }

    info!("Goodbye.");

    Ok(())
}

fn setup_logging() -> Result<()> {
    use tracing_subscriber::{prelude::*, EnvFilter};
    use tracing_tree::HierarchicalLayer;

    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(HierarchicalLayer::new(4).with_bracketed_fields(true))
        .with(EnvFilter::from_default_env())
        .try_init()?;

    Ok(())
}
