use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use handwerk_pdf::documents;
use handwerk_pdf::model::{DocumentRecord, PrintSettings};
use log::info;

/// Renders offers and invoices from JSON records.
///
/// Fonts must be present under `assets/fonts` relative to the `handwerk_pdf`
/// crate or provided via the `HANDWERK_PDF_FONTS_DIR` environment variable
/// before running `render`.
#[derive(Parser)]
#[command(author, version, about = "Offer and invoice PDF generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Inputs {
    /// Offer or invoice record as JSON.
    #[arg(long)]
    record: PathBuf,

    /// Tenant print settings as JSON.
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the record to `<id> [<company>] [<last name>].pdf`.
    Render {
        #[command(flatten)]
        inputs: Inputs,

        /// Directory the PDF is written to.
        #[arg(long, default_value = ".", env = "HANDWERK_PDF_OUT_DIR")]
        out_dir: PathBuf,
    },

    /// Print the page layout using estimated metrics; no fonts required.
    Layout {
        #[command(flatten)]
        inputs: Inputs,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render { inputs, out_dir } => render(&inputs, &out_dir),
        Commands::Layout { inputs } => layout(&inputs),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let data = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {}", path.display(), err))?;
    let value = serde_json::from_str(&data)
        .map_err(|err| format!("failed to parse {}: {}", path.display(), err))?;
    Ok(value)
}

fn load(inputs: &Inputs) -> Result<(DocumentRecord, PrintSettings), Box<dyn Error>> {
    let record = read_json(&inputs.record)?;
    let settings = match &inputs.settings {
        Some(path) => read_json(path)?,
        None => PrintSettings::default(),
    };
    Ok((record, settings))
}

fn render(inputs: &Inputs, out_dir: &Path) -> Result<(), Box<dyn Error>> {
    let (record, settings) = load(inputs)?;
    fs::create_dir_all(out_dir)?;
    let path = documents::create_pdf(&record, &settings, out_dir)?;
    info!("render finished");
    println!("Generated {}", path.display());
    Ok(())
}

fn layout(inputs: &Inputs) -> Result<(), Box<dyn Error>> {
    let (record, settings) = load(inputs)?;
    let document = documents::preview_layout(&record, &settings)?;
    println!(
        "{} ({} pages)",
        documents::document_file_name(&record),
        document.page_count()
    );
    for (index, page) in document.pages().iter().enumerate() {
        println!("--- page {} ---", index + 1);
        for text in page.texts() {
            println!("  {}", text);
        }
    }
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
