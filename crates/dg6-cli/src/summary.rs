use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dg6_cli::types::{BuildResult, RunReport};
use dg6_model::SourceMetadata;

pub fn print_run_report(report: &RunReport) {
    println!("Source: {}", report.source);
    println!("Format: {}", report.detected_format);
    println!("Config: {}", report.config_path.display());
    println!("Output: {}", report.output_dir.display());
    match &report.build {
        Some(build) => print_build(build),
        None => println!("No outputs built."),
    }
}

fn print_build(build: &BuildResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("File"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);

    let mut total_rows = 0usize;
    for summary in &build.tables {
        total_rows += summary.rows;
        table.add_row(vec![
            Cell::new(&summary.name).add_attribute(Attribute::Bold),
            Cell::new(summary.rows),
            Cell::new(summary.columns),
            dim_cell(summary.path.display()),
        ]);
    }
    let meta_path = build
        .written
        .last()
        .map(|path| path.display().to_string())
        .unwrap_or_default();
    table.add_row(vec![
        Cell::new("_meta").fg(Color::DarkGrey),
        Cell::new(build.meta_rows),
        dim_cell("-"),
        dim_cell(meta_path),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell(format!("{} files", build.written.len())),
    ]);
    println!("{table}");

    match build.drop_result {
        Some(stats) => println!(
            "Entities: {} total, {} dropped, {} retained",
            stats.entities_total,
            stats.entities_dropped,
            stats.entities_retained()
        ),
        None => println!("Entities: empty-entity drop disabled"),
    }
}

pub fn print_metadata(metadata: &SourceMetadata) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    let fields = [
        ("last_updated", metadata.last_updated.clone()),
        ("data_category", metadata.data_category.clone()),
        ("calendar_basis", metadata.calendar_basis.map(|v| v.to_string())),
        ("code_portfolio", metadata.code_portfolio.clone()),
        ("frequency", metadata.frequency.clone()),
        ("currency", metadata.currency.clone()),
        ("sort_order", metadata.sort_order.clone()),
        ("non_business_days", metadata.non_business_days.clone()),
        ("include_weekends", metadata.include_weekends.clone()),
        ("period_start", metadata.period_start.clone()),
        ("period_end", metadata.period_end.clone()),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            table.add_row(vec![Cell::new(name), Cell::new(value)]);
        }
    }
    for (name, value) in &metadata.extra {
        table.add_row(vec![dim_cell(name), Cell::new(value)]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
