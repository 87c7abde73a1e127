//! Command-line front end for pdfmetaedit.
//!
//! Prints the metadata of a PDF, optionally applies edits, and writes the
//! edited copy under a derived filename.

use pdfmetaedit::{EditorConfig, Field, MetadataEditor, MetadataRecord, Result};
use std::path::Path;
use std::{env, fs, process};

struct Options {
    input: String,
    edits: Vec<(Field, String)>,
    output_name: Option<String>,
    output_dir: String,
    lenient_dates: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("pdfmetaedit");

    if args.len() < 2 || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage(program);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let options = match parse_args(&args[1..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("❌ {message}");
            eprintln!("Run '{program} --help' for usage.");
            process::exit(2);
        }
    };

    if let Err(e) = run(&options) {
        eprintln!("\n❌ Error: {e}");
        process::exit(1);
    }
}

fn print_usage(program_name: &str) {
    println!("📄 pdfmetaedit - PDF Metadata Viewer & Editor");
    println!();
    println!("USAGE:");
    println!("    {program_name} <pdf_file> [OPTIONS]");
    println!();
    println!("ARGUMENTS:");
    println!("    <pdf_file>             Path to the PDF file to inspect");
    println!();
    println!("OPTIONS:");
    println!("    --set <Field>=<value>  Change a field (repeatable)");
    println!("    --output <name>        Filename for the edited copy");
    println!("    --out-dir <dir>        Directory for the edited copy (default: '.')");
    println!("    --lenient-dates        Accept any ISO-8601-like date on commit");
    println!("    -h, --help             Show this help message");
    println!();
    println!("FIELDS:");
    let labels: Vec<&str> = Field::ALL.iter().map(|f| f.label()).collect();
    println!("    {}", labels.join(", "));
    println!();
    println!("EXAMPLES:");
    println!("    {program_name} report.pdf");
    println!("    {program_name} report.pdf --set Title=\"Q3 Report\" --set Keywords=\"finance, q3\"");
    println!("    {program_name} report.pdf --set CreationDate=2024-01-15T10:30:00Z --output final");
    println!();
    println!("Without --set or --output the file is only inspected.");
}

fn parse_args(args: &[String]) -> std::result::Result<Options, String> {
    let mut iter = args.iter();
    let input = iter
        .next()
        .cloned()
        .ok_or_else(|| "missing <pdf_file>".to_string())?;

    let mut options = Options {
        input,
        edits: Vec::new(),
        output_name: None,
        output_dir: ".".into(),
        lenient_dates: false,
    };

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--set" => {
                let spec = iter.next().ok_or("--set needs <Field>=<value>")?;
                let (name, value) = spec
                    .split_once('=')
                    .ok_or_else(|| format!("expected <Field>=<value>, got '{spec}'"))?;
                let field: Field = name.parse().map_err(|e| format!("{e}"))?;
                options.edits.push((field, value.to_string()));
            }
            "--output" => {
                let name = iter.next().ok_or("--output needs a filename")?;
                options.output_name = Some(name.clone());
            }
            "--out-dir" => {
                let dir = iter.next().ok_or("--out-dir needs a directory")?;
                options.output_dir = dir.clone();
            }
            "--lenient-dates" => options.lenient_dates = true,
            other => return Err(format!("unexpected argument '{other}'")),
        }
    }

    Ok(options)
}

fn run(options: &Options) -> Result<()> {
    println!("🔍 Reading PDF: {}", options.input);

    let bytes = fs::read(&options.input)?;
    let original_name = Path::new(&options.input)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| options.input.clone());

    let config = EditorConfig {
        lenient_dates: options.lenient_dates,
        max_input_size: Some(512 * 1024 * 1024), // 512MB limit
        export_to_disk: true,
        output_directory: Some(options.output_dir.clone()),
    };

    let mut editor: MetadataEditor = MetadataEditor::with_config(config);
    let record = editor.load(&bytes, &original_name)?;
    print_record("Current metadata", record);

    if options.edits.is_empty() && options.output_name.is_none() {
        return Ok(());
    }

    for (field, value) in &options.edits {
        editor.set_field(*field, value)?;
        if let Some(warning) = editor.record().and_then(|r| r.warning(*field)) {
            println!("⚠️  {warning}");
        }
    }

    let filename_input = options.output_name.as_deref().unwrap_or("");
    let artifact = editor.commit(filename_input)?;

    for skipped in &artifact.skipped {
        println!("⚠️  Skipped {}: kept the previous value", skipped.field);
    }

    if let Some(record) = editor.record() {
        print_record("Updated metadata", record);
    }

    if let Some(artifact) = editor.artifact() {
        let dest = Path::new(&options.output_dir).join(&artifact.filename);
        println!("\n💾 {} → {}", artifact.label(), dest.display());
        println!("   📏 Size: {} bytes", artifact.data.len());
    }

    Ok(())
}

fn print_record(heading: &str, record: &MetadataRecord) {
    println!("\n📋 {heading}:");
    println!("{}", "─".repeat(60));
    for (label, value) in record.rows() {
        let shown = if value.is_empty() { "—" } else { value.as_str() };
        println!("   {label:<18} {shown}");
    }
}
