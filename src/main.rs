use tracing::error;
use tg_log::cli::{build_cli, run};
use tg_log::internal::config::AppConfig;
use tg_log::internal::logger::init_logger;

fn main() -> anyhow::Result<()> {
    // Parse command line arguments first
    let matches = build_cli().get_matches();
    let config = match AppConfig::load_from_args(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    if let Err(e) = init_logger(&config.logging) {
        eprintln!("Failed to initialize logger: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&matches, &config) {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
