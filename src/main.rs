use anyhow::Context;
use clap::Parser;
use small_library::utils::{logger, validation::Validate};
use small_library::{Catalog, CliConfig, ConfigProvider, FileRepository, LocalStorage, Shell};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if settings.log_json {
        logger::init_json_logger(settings.verbose);
    } else {
        logger::init_cli_logger(settings.verbose);
    }

    tracing::info!("Starting small-library");
    tracing::debug!("Effective settings: {:?}", settings);

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(settings.data_dir().to_string());
    let repository = FileRepository::new(storage, settings.record_format());
    let mut catalog = Catalog::new();

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut shell = Shell::new(&mut catalog, &repository, stdin.lock(), stdout.lock());

    if let Err(e) = shell.load().and_then(|_| shell.run()) {
        if !e.is_fatal() {
            return Err(e).context("failed to write to the console");
        }
        // 致命錯誤：不保存，直接結束
        tracing::error!("Session ended: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    tracing::info!("Session finished");
    Ok(())
}
