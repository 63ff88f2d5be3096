//! biuro CLI - invoice PDF generation tool

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;

use biuro::Config;

#[derive(Parser)]
#[command(name = "biuro")]
#[command(version)]
#[command(about = "Render KSeF invoice XML to a paginated PDF", long_about = None)]
struct Cli {
    /// Input KSeF XML file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output directory for the generated PDF (env: OUTPUT_DIR)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// TTF font for native-character rendering
    #[arg(long, value_name = "FILE", env = "INVOICE_FONT")]
    font: Option<PathBuf>,

    /// Override the KSeF tracking number printed in the header
    #[arg(long, value_name = "NUMBER", env = "KSEF_NUMBER")]
    ksef_number: Option<String>,
}

fn main() {
    // .env first, so its keys are visible to clap's env fallbacks.
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(font) = cli.font {
        config.font_path = Some(font);
    }
    if let Some(number) = cli.ksef_number.filter(|n| !n.is_empty()) {
        config.tracking_override = Some(number);
    }

    match biuro::generate_file(&cli.input, &config) {
        Ok(path) => {
            println!("{} {}", "Generated".green().bold(), path.display());
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}
