use std::path::Path;

use anyhow::Result;
use comfy_table::Table;

use dg6_cli::pipeline::{
    InitOptions, OpenOptions, detect_and_parse, ingest, init, load_registry, open,
};

use crate::cli::{DetectArgs, IngestArgs, InitArgs, OpenArgs};
use crate::summary::{apply_table_style, print_metadata, print_run_report};

pub fn run_detect(args: &DetectArgs, layouts_dir: Option<&Path>) -> Result<()> {
    let registry = load_registry(layouts_dir)?;
    let (detection, parsed) = detect_and_parse(&args.input, &registry)?;
    println!("Source: {}", args.input.display());
    println!("Format: {}", detection.layout.format_name);
    println!("Parser: {}", detection.parser);
    println!(
        "Table: {} rows x {} columns, {} items",
        parsed.table.height(),
        parsed.table.width(),
        parsed.items.len()
    );
    println!("Key columns: {}", parsed.key_columns.join(", "));
    print_metadata(&parsed.metadata);
    Ok(())
}

pub fn run_layouts(layouts_dir: Option<&Path>) -> Result<()> {
    let registry = load_registry(layouts_dir)?;
    let mut table = Table::new();
    table.set_header(vec!["Format", "Category", "Orientation", "Header row"]);
    apply_table_style(&mut table);
    for layout in registry.layouts() {
        table.add_row(vec![
            layout.format_name.clone(),
            layout.format_category.to_string(),
            layout.format_orientation.to_string(),
            layout.data_header_row().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_init(args: &InitArgs, layouts_dir: Option<&Path>) -> Result<()> {
    let registry = load_registry(layouts_dir)?;
    let options = InitOptions {
        config_path: args.config.clone(),
        output_dir: args.output_dir.clone(),
        run: !args.no_run,
    };
    let report = init(&args.input, &registry, &options)?;
    print_run_report(&report);
    Ok(())
}

pub fn run_ingest(args: &IngestArgs, layouts_dir: Option<&Path>) -> Result<()> {
    let registry = load_registry(layouts_dir)?;
    let report = ingest(&args.config, &registry)?;
    print_run_report(&report);
    Ok(())
}

pub fn run_open(args: &OpenArgs, layouts_dir: Option<&Path>) -> Result<()> {
    let registry = load_registry(layouts_dir)?;
    let options = OpenOptions {
        output_dir: args.output_dir.clone(),
        config_path: args.config.clone(),
        run: !args.no_run,
        force: args.force,
    };
    let report = open(&args.path, &registry, &options)?;
    print_run_report(&report);
    Ok(())
}
