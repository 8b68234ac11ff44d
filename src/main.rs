use clap::Parser;
use contact_relay::core::ConfigProvider;
use contact_relay::utils::error::{ErrorSeverity, Result};
use contact_relay::utils::{logger, validation::Validate};
use contact_relay::{ContactServer, ServerConfig, TomlConfig};

#[tokio::main]
async fn main() {
    let cli = ServerConfig::parse();

    let result = match cli.config.clone() {
        Some(path) => {
            // 載入 TOML 配置，命令列的 --verbose 優先
            let mut config = match TomlConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            if cli.verbose {
                config.logging.verbose = true;
            }
            start(config).await
        }
        None => start(cli).await,
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ contact-relay failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low | ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn start<C: ConfigProvider + Validate>(config: C) -> Result<()> {
    logger::init_logger(config.log_format(), config.verbose());

    tracing::info!("Starting contact-relay v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e);
    }

    ContactServer::new(config).run().await
}
