//! pdfwb CLI - merge, filter, reorder and extract PDF documents

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_workbench::{
    build_extraction_zip_with, bundle_filtered, parse_page_list, ArchiveOptions, ExtractOptions,
    PageOrdering, Session, FILTERED_BUNDLE_NAME, MERGED_OUTPUT_NAME, ORGANIZED_OUTPUT_NAME,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pdfwb")]
#[command(version)]
#[command(about = "Merge, filter, reorder and extract PDF documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show document information
    Info {
        /// Input PDF files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List page references ("<doc>:<page> | <label>") in natural or given order
    Refs {
        /// Input PDF files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Page order as comma-separated "<doc>:<page>" keys
        #[arg(long, value_delimiter = ',')]
        order: Vec<String>,

        /// First position to show
        #[arg(long, default_value = "0")]
        start: usize,

        /// Maximum number of references to show
        #[arg(long, default_value = "20")]
        max: usize,
    },

    /// Merge selected pages of all inputs into one PDF
    Merge {
        /// Input PDF files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Output file
        #[arg(short, long, value_name = "FILE", default_value = MERGED_OUTPUT_NAME)]
        output: PathBuf,
    },

    /// Write one PDF per input holding only its selected pages
    Filter {
        /// Input PDF files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,
    },

    /// Build one PDF from an explicit cross-document page order
    Reorder {
        /// Input PDF files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Page order as comma-separated "<doc>:<page>" keys (zero-based)
        #[arg(long, value_delimiter = ',', required = true)]
        order: Vec<String>,

        /// Output file
        #[arg(short, long, value_name = "FILE", default_value = ORGANIZED_OUTPUT_NAME)]
        output: PathBuf,
    },

    /// Extract text, formulas, images and tables into a ZIP archive
    Extract {
        /// Input PDF files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output archive
        #[arg(short, long, value_name = "FILE", default_value = "extracted.zip")]
        output: PathBuf,

        /// Skip images
        #[arg(long, env = "PDFWB_NO_IMAGES")]
        no_images: bool,

        /// Skip formula detection
        #[arg(long, env = "PDFWB_NO_FORMULAS")]
        no_formulas: bool,

        /// Skip table detection
        #[arg(long, env = "PDFWB_NO_TABLES")]
        no_tables: bool,

        /// Store entries without compression
        #[arg(long)]
        stored: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct SelectionArgs {
    /// Page selection as "<file or index>=<pages>", e.g. "a.pdf=1,3-5" (one-based).
    /// Files without a selection contribute every page.
    #[arg(short = 's', long = "select", value_name = "SPEC")]
    selections: Vec<String>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Info { inputs, json } => cmd_info(&inputs, json),
        Commands::Refs {
            inputs,
            order,
            start,
            max,
        } => cmd_refs(&inputs, &order, start, max),
        Commands::Merge {
            inputs,
            selection,
            output,
        } => cmd_merge(&inputs, &selection, &output),
        Commands::Filter {
            inputs,
            selection,
            output,
        } => cmd_filter(&inputs, &selection, &output),
        Commands::Reorder {
            inputs,
            order,
            output,
        } => cmd_reorder(&inputs, &order, &output),
        Commands::Extract {
            inputs,
            output,
            no_images,
            no_formulas,
            no_tables,
            stored,
        } => {
            let options = ExtractOptions::new()
                .with_images(!no_images)
                .with_formulas(!no_formulas)
                .with_tables(!no_tables);
            let archive = if stored {
                ArchiveOptions::new().stored()
            } else {
                ArchiveOptions::new()
            };
            cmd_extract(&inputs, &output, &options, &archive)
        }
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Load inputs, skipping files that do not parse.
fn load_session(inputs: &[PathBuf]) -> CliResult<Session> {
    let mut files = Vec::with_capacity(inputs.len());
    for path in inputs {
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        files.push((label, fs::read(path)?));
    }

    let mut session = Session::new();
    let report = session.import_all(files);
    log::debug!("Loaded {} of {} input(s)", report.loaded.len(), inputs.len());
    for label in &report.duplicates {
        println!("{} {} (already loaded)", "Skipped".yellow(), label);
    }
    for (label, reason) in &report.skipped {
        println!("{} {}: {}", "Skipped".yellow(), label, reason);
    }
    if session.documents().is_empty() {
        return Err("no readable PDF documents".into());
    }
    Ok(session)
}

/// Apply `--select` specs to the session.
fn apply_selections(session: &mut Session, args: &SelectionArgs) -> CliResult<()> {
    for spec in &args.selections {
        let (target, pages) = spec
            .split_once('=')
            .ok_or_else(|| format!("Invalid selection '{}': expected <file>=<pages>", spec))?;

        let label = match target.parse::<usize>() {
            Ok(index) => session
                .documents()
                .get_index(index)
                .map(|d| d.label.clone())
                .ok_or_else(|| format!("No document at index {}", index))?,
            Err(_) => target.to_string(),
        };

        let pages = parse_page_list(pages)?;
        session.set_selection(&label, pages)?;
    }
    Ok(())
}

fn spinner(message: &str) -> CliResult<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn saved(path: &Path, bytes: usize) {
    println!(
        "{} {} ({} bytes)",
        "Saved to".green(),
        path.display(),
        bytes
    );
}

fn cmd_info(inputs: &[PathBuf], json: bool) -> CliResult<()> {
    let session = load_session(inputs)?;

    if json {
        println!("{}", serde_json::to_string_pretty(session.documents())?);
        return Ok(());
    }

    println!("{}", "Documents".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (index, document) in session.documents().iter().enumerate() {
        println!("{}: {}", "Index".bold(), index);
        println!("{}: {}", "File".bold(), document.label);
        println!("{}: PDF {}", "Format".bold(), document.pdf_version);
        println!("{}: {}", "Pages".bold(), document.page_count);
        println!("{}: {} bytes", "Size".bold(), document.data().len());
        println!();
    }
    println!(
        "{}: {}",
        "Total pages".bold(),
        session.documents().total_pages()
    );

    Ok(())
}

fn cmd_refs(inputs: &[PathBuf], order: &[String], start: usize, max: usize) -> CliResult<()> {
    let mut session = load_session(inputs)?;
    if order.is_empty() {
        let organizer = session.organizer();
        session.apply_organizer(&organizer);
    } else {
        session.set_ordering(order)?;
    }

    let documents = session.documents().as_slice();
    let ordering = session.get_ordering();
    ordering.resolve(documents)?;

    let visible = PageOrdering::from(ordering.window(start, max).to_vec());
    for page_ref in visible.resolve(documents)? {
        println!("{}", page_ref.item());
    }
    println!(
        "\n{} {} of {} page(s)",
        "Showing".dimmed(),
        visible.len(),
        ordering.len()
    );
    Ok(())
}

fn cmd_merge(inputs: &[PathBuf], selection: &SelectionArgs, output: &Path) -> CliResult<()> {
    let mut session = load_session(inputs)?;
    apply_selections(&mut session, selection)?;

    let pb = spinner("Merging pages...")?;
    let bytes = session.merge()?;
    pb.finish_and_clear();

    fs::write(output, &bytes)?;
    saved(output, bytes.len());
    Ok(())
}

fn cmd_filter(inputs: &[PathBuf], selection: &SelectionArgs, output: &Path) -> CliResult<()> {
    let mut session = load_session(inputs)?;
    apply_selections(&mut session, selection)?;
    fs::create_dir_all(output)?;

    let pb = spinner("Filtering pages...")?;
    let mut outputs = session.filter_all()?;
    pb.finish_and_clear();

    if outputs.len() == 1 {
        let (name, bytes) = outputs.remove(0);
        let path = output.join(name);
        fs::write(&path, &bytes)?;
        saved(&path, bytes.len());
    } else {
        let bytes = bundle_filtered(outputs)?;
        let path = output.join(FILTERED_BUNDLE_NAME);
        fs::write(&path, &bytes)?;
        saved(&path, bytes.len());
    }
    Ok(())
}

fn cmd_reorder(inputs: &[PathBuf], order: &[String], output: &Path) -> CliResult<()> {
    let mut session = load_session(inputs)?;
    session.set_ordering(order)?;

    let pb = spinner("Building ordered PDF...")?;
    let bytes = session.build_ordered()?;
    pb.finish_and_clear();

    fs::write(output, &bytes)?;
    saved(output, bytes.len());
    Ok(())
}

fn cmd_extract(
    inputs: &[PathBuf],
    output: &Path,
    options: &ExtractOptions,
    archive_options: &ArchiveOptions,
) -> CliResult<()> {
    let session = load_session(inputs)?;

    let pb = spinner("Extracting content...")?;
    let archive =
        build_extraction_zip_with(session.documents().as_slice(), options, archive_options)?;
    pb.finish_and_clear();

    fs::write(output, &archive.bytes)?;
    saved(output, archive.bytes.len());

    let summary = &archive.summary;
    println!("\n{}", "Extracted:".green().bold());
    println!("  {} {} pages", "├─".dimmed(), summary.pages);
    println!("  {} {} formulas", "├─".dimmed(), summary.formulas);
    println!("  {} {} images", "├─".dimmed(), summary.images);
    println!(
        "  {} {} tables ({} as plain rows)",
        "├─".dimmed(),
        summary.tables,
        summary.markdown_fallbacks
    );
    println!("  {} {} files", "└─".dimmed(), archive.entries);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfwb".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF merge, filter, reorder and extraction tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal PDF with one line of text per page and an inherited font.
    fn sample_pdf(pages: &[&str]) -> Vec<u8> {
        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            String::new(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];
        let mut kids = Vec::new();
        for text in pages {
            let page_id = objects.len() + 1;
            let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text);
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /Contents {} 0 R >>",
                page_id + 1
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ));
            kids.push(format!("{} 0 R", page_id));
        }
        objects[1] = format!(
            "<< /Type /Pages /Kids [{}] /Count {} /Resources << /Font << /F1 3 0 R >> >> /MediaBox [0 0 612 792] >>",
            kids.join(" "),
            kids.len()
        );

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).into_bytes());
        }
        let xref = out.len();
        out.extend(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).into_bytes());
        for offset in offsets {
            out.extend(format!("{:010} 00000 n \n", offset).into_bytes());
        }
        out.extend(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref
            )
            .into_bytes(),
        );
        out
    }

    fn write_inputs(dir: &Path, files: &[(&str, Vec<u8>)]) -> Vec<PathBuf> {
        files
            .iter()
            .map(|(name, bytes)| {
                let path = dir.join(name);
                fs::write(&path, bytes).unwrap();
                path
            })
            .collect()
    }

    fn select(specs: &[&str]) -> SelectionArgs {
        SelectionArgs {
            selections: specs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_load_session_skips_unreadable_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(
            dir.path(),
            &[
                ("a.pdf", sample_pdf(&["A1", "A2"])),
                ("notes.txt", b"not a pdf".to_vec()),
            ],
        );

        let session = load_session(&inputs).unwrap();
        assert_eq!(session.documents().len(), 1);
        assert_eq!(session.documents().as_slice()[0].page_count, 2);

        assert!(load_session(&inputs[1..]).is_err());
    }

    #[test]
    fn test_apply_selections_by_label_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(
            dir.path(),
            &[
                ("a.pdf", sample_pdf(&["A1", "A2", "A3"])),
                ("b.pdf", sample_pdf(&["B1", "B2"])),
            ],
        );
        let mut session = load_session(&inputs).unwrap();

        apply_selections(&mut session, &select(&["a.pdf=1,3", "1=2"])).unwrap();
        assert_eq!(session.total_selected(), 3);

        assert!(apply_selections(&mut session, &select(&["a.pdf"])).is_err());
        assert!(apply_selections(&mut session, &select(&["7=1"])).is_err());
    }

    #[test]
    fn test_filter_writes_single_file_or_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(
            dir.path(),
            &[
                ("a.pdf", sample_pdf(&["A1", "A2"])),
                ("b.pdf", sample_pdf(&["B1"])),
            ],
        );

        let single = dir.path().join("single");
        cmd_filter(&inputs[..1], &select(&["a.pdf=2"]), &single).unwrap();
        let filtered = single.join("a_filtered.pdf");
        let session = load_session(&[filtered]).unwrap();
        assert_eq!(session.documents().as_slice()[0].page_count, 1);

        let bundle = dir.path().join("bundle");
        cmd_filter(&inputs, &select(&[]), &bundle).unwrap();
        assert!(bundle.join(FILTERED_BUNDLE_NAME).is_file());
        assert!(!bundle.join("a_filtered.pdf").exists());
    }

    #[test]
    fn test_reorder_writes_requested_pages() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(
            dir.path(),
            &[
                ("a.pdf", sample_pdf(&["A1", "A2"])),
                ("b.pdf", sample_pdf(&["B1"])),
            ],
        );
        let output = dir.path().join(ORGANIZED_OUTPUT_NAME);
        let order = ["1:0", "0:1", "1:0"].map(String::from);

        cmd_reorder(&inputs, &order, &output).unwrap();
        let session = load_session(&[output]).unwrap();
        assert_eq!(session.documents().as_slice()[0].page_count, 3);

        let bad = dir.path().join("bad.pdf");
        assert!(cmd_reorder(&inputs, &["2:0".to_string()], &bad).is_err());
        assert!(!bad.exists());
    }
}
