mod logger;

use anyhow::{Context, Result, bail};
use barcode_sheets::{
    DirectoryResolver, ItemList, LayoutOptions, Margins, Settings, filter_images,
    list_barcode_images, load_from_csv, parse_quantity, summarize,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use logger::StderrLogger;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bsheets", about = "Lay out barcode images onto printable PDF sheets", version)]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file holding the default barcode directory
    #[arg(long, default_value = "bsheets.json", global = true)]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List barcode images available in the barcode directory
    List {
        /// Barcode directory (defaults to the one in the settings file)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Only show names containing this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Generate a PDF of barcode sheets
    Generate {
        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Barcode directory (defaults to the one in the settings file)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Item to print, as IDENTIFIER=QUANTITY (quantity defaults to 1)
        #[arg(short, long = "item", value_name = "ID[=QTY]")]
        items: Vec<String>,

        /// CSV file of identifier,quantity rows
        #[arg(long)]
        items_csv: Option<PathBuf>,

        /// Layout options JSON file; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Paper size
        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Page orientation
        #[arg(long, value_enum)]
        orientation: Option<OrientationArg>,

        /// Page margin in mm (uniform on all sides)
        #[arg(long)]
        margin: Option<f32>,

        /// Width of every placed image in mm
        #[arg(long)]
        image_width: Option<f32>,

        /// Page header (defaults to the output file name)
        #[arg(long)]
        title: Option<String>,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// Remember the barcode directory in the settings file
    SetDir {
        dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<PaperArg> for barcode_sheets::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
        }
    }
}

impl From<OrientationArg> for barcode_sheets::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

/// Parse `ID=QTY` or a bare `ID`
fn parse_item_arg(arg: &str) -> Result<(String, u32)> {
    match arg.rsplit_once('=') {
        Some((id, quantity)) => {
            let id = id.trim();
            if id.is_empty() {
                bail!("Missing identifier in '{}'", arg);
            }
            Ok((id.to_string(), parse_quantity(id, quantity)?))
        }
        None => Ok((arg.trim().to_string(), 1)),
    }
}

fn default_title(output: &Path) -> String {
    output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    StderrLogger::from_verbosity(cli.verbose).init()?;

    let settings = Settings::load_or_default(&cli.settings)
        .await
        .with_context(|| format!("Failed to read settings from {}", cli.settings.display()))?;

    match cli.command {
        Commands::List { dir, filter } => {
            let dir = dir.unwrap_or(settings.barcode_dir);
            let names = list_barcode_images(&dir).await?;
            let shown = filter_images(&names, filter.as_deref().unwrap_or(""));
            for name in &shown {
                println!("{}", name);
            }
            println!("{} of {} images in {}", shown.len(), names.len(), dir.display());
        }

        Commands::Generate {
            output,
            dir,
            items: item_args,
            items_csv,
            config,
            paper,
            orientation,
            margin,
            image_width,
            title,
            stats_only,
        } => {
            let dir = dir.unwrap_or(settings.barcode_dir);

            let mut options = match &config {
                Some(path) => LayoutOptions::load(path).await?,
                None => LayoutOptions::default(),
            };
            if let Some(paper) = paper {
                options.paper_size = paper.into();
            }
            if let Some(orientation) = orientation {
                options.orientation = orientation.into();
            }
            if let Some(margin) = margin {
                options.margins = Margins::uniform(margin);
            }
            if let Some(width) = image_width {
                options.image_width_mm = width;
            }
            if let Some(title) = title {
                options.title = title;
            } else if options.title.is_empty() {
                options.title = default_title(&output);
            }

            let mut items = match &items_csv {
                Some(path) => load_from_csv(path).await?,
                None => ItemList::new(),
            };
            for arg in &item_args {
                let (id, quantity) = parse_item_arg(arg)?;
                items.set(id, quantity);
            }
            if items.is_empty() {
                bail!("No items given; use --item or --items-csv");
            }
            debug!("{} items, {} images requested", items.len(), items.total_quantity());

            let summary = if stats_only {
                tokio::task::spawn_blocking(move || {
                    let resolver = DirectoryResolver::new(&dir);
                    barcode_sheets::layout(&items, &resolver, &options).map(|out| summarize(&out))
                })
                .await??
            } else {
                barcode_sheets::generate_pdf(&items, &dir, &options, &output).await?
            };

            for id in &summary.skipped {
                println!("  skipped: {}", id);
            }
            println!("{}", summary);
            if !stats_only {
                println!("Saved → {}", output.display());
            }
        }

        Commands::SetDir { dir } => {
            let settings = Settings { barcode_dir: dir };
            settings.save(&cli.settings).await?;
            println!(
                "Barcode directory set to {} ({})",
                settings.barcode_dir.display(),
                cli.settings.display()
            );
        }
    }

    Ok(())
}
