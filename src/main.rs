use clap::Parser;
use shipping_weight::core::{ConfigProvider, MasterDataSource, UploadSource};
use shipping_weight::core::shipment::display_kg;
use shipping_weight::utils::error::ErrorSeverity;
use shipping_weight::utils::{logger, validation, validation::Validate};
use shipping_weight::{
    BulkInputRow, CliConfig, Command, CsvLoader, LocalStorage, ReportWriter, ShipError,
    ShipmentOutcome, ShipmentReport, ShipmentSession, TomlConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let config = match TomlConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.json_logging() {
        logger::init_json_logger(cli.verbose, config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }

    tracing::info!("Starting shipweight");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    if let Err(e) = config.validate() {
        exit_with(e);
    }

    let loader = CsvLoader::new(LocalStorage::new("."), config.clone());

    // Master data problems halt the session before any calculation.
    let store = match loader.load_master_data().await {
        Ok(store) => store,
        Err(e) => exit_with(e),
    };
    let session = ShipmentSession::new(store);

    match cli.command {
        Command::Products => {
            for id in session.product_identifiers() {
                match session.unit_weight(id) {
                    Ok(Some(weight)) => println!("{}\t{}", id, display_kg(weight)),
                    _ => println!("{}\t(no unit weight)", id),
                }
            }
        }
        Command::Pallets => {
            for id in session.pallet_identifiers() {
                if let Some(pallet) = session.store().find_pallet(id) {
                    println!("{}\t{}", id, display_kg(pallet.weight));
                }
            }
        }
        Command::Single {
            product,
            quantity,
            pallet,
        } => {
            if let Err(e) = validation::validate_range("quantity", quantity, 1, i64::MAX) {
                exit_with(e);
            }
            match session.unit_weight(&product) {
                Ok(Some(weight)) => println!("Unit weight: {}", display_kg(weight)),
                Ok(None) => println!("Unit weight: (missing in master data)"),
                Err(not_found) => {
                    eprintln!("❌ {}", not_found);
                    std::process::exit(2);
                }
            }
            let report = session.calculate_shipment(BulkInputRow::single(product, quantity), &pallet);
            finish(&report);
        }
        Command::Bulk {
            upload,
            pallet,
            write_report,
        } => {
            if let Err(e) = validation::validate_file_extension("upload", &upload, &["csv", "tsv", "txt"]) {
                exit_with(e);
            }
            let rows = match loader.read_upload(&upload).await {
                Ok(rows) => rows,
                Err(e) => exit_with(e),
            };
            let report = session.calculate_shipment(rows, &pallet);
            print_table(&report);

            if write_report {
                let storage = LocalStorage::new(config.output_path());
                let writer = ReportWriter::new(storage, config.output_formats().to_vec());
                match writer.write(&report).await {
                    Ok(files) => {
                        tracing::info!("📁 Report written to {}: {:?}", config.output_path(), files)
                    }
                    Err(e) => exit_with(e),
                }
            }
            finish(&report);
        }
    }

    Ok(())
}

fn print_table(report: &ShipmentReport<'_>) {
    println!("{:<20} {:>8} {:>14} {:>14}  status", "identifier", "quantity", "unit weight", "subtotal");
    for row in report.entry.table() {
        println!(
            "{:<20} {:>8} {:>14} {:>14}  {}",
            row.identifier,
            row.quantity,
            row.unit_weight.map(display_kg).unwrap_or_else(|| "-".to_string()),
            row.subtotal.map(display_kg).unwrap_or_else(|| "-".to_string()),
            row.status
        );
    }
    if let Some(total) = report.entry.outcome.total_weight() {
        println!("✅ Product total: {}", display_kg(total));
    }
}

fn finish(report: &ShipmentReport<'_>) {
    match &report.outcome {
        ShipmentOutcome::Calculated(calculation) => {
            println!("Pallet: {}", report.pallet);
            println!("{}", calculation);
        }
        ShipmentOutcome::Unresolved { .. } => {
            for (identifier, reason) in report.entry.unresolved() {
                eprintln!("❌ {}: {}", identifier, reason);
            }
            eprintln!("💡 No shipment total was computed; fix the listed codes and retry");
            std::process::exit(2);
        }
        ShipmentOutcome::PalletNotFound(not_found) => {
            eprintln!("❌ {}", not_found);
            std::process::exit(2);
        }
    }
}

fn exit_with(e: ShipError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
