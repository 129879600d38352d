use clap::Parser;
use panel_check::core::report;
use panel_check::utils::{logger, validation::Validate};
use panel_check::{CliConfig, EnableChecker, LocalStorage, PanelClient, ReportWriter, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting panel-check");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = match Settings::resolve(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let client = match PanelClient::new(&settings.base_url, settings.timeout_seconds) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let checker = EnableChecker::new(client, &settings);

    match checker.run().await {
        Ok(check_report) => {
            println!("{}", report::render_text(&check_report));

            if let Some(path) = &settings.output_path {
                let storage = LocalStorage::new(path.clone());
                let writer = ReportWriter::new(storage);
                match writer.write(&check_report, &settings.formats).await {
                    Ok(written) => {
                        for filename in written {
                            tracing::info!("📁 Report written to {}/{}", path, filename);
                        }
                    }
                    Err(e) => {
                        tracing::error!("❌ Failed to write report: {}", e);
                        eprintln!("❌ {}", e);
                        std::process::exit(1);
                    }
                }
            }

            if check_report.has_mismatches() {
                eprintln!(
                    "✗ {} client(s) expected disabled but still enabled; check the panel's enable serialization",
                    check_report.mismatches.len()
                );
                std::process::exit(2);
            }

            println!("✅ Check complete");
        }
        Err(e) => {
            tracing::error!("❌ Check failed: {}", e);
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
