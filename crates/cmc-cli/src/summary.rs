use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cmc_cli::report::{InspectReport, TypeSummary, UNKNOWN_TYPE};

pub fn print_report(path: &Path, report: &InspectReport<'_>) {
    let header = report.file.header;
    println!("File: {}", path.display());

    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![header_cell("Attribute"), header_cell("Value")]);
    table.add_row(vec![Cell::new("EXTNAME"), Cell::new(&header.extname)]);
    table.add_row(vec![Cell::new("NOBJ"), Cell::new(header.nobj)]);
    table.add_row(vec![Cell::new("NBINARY"), Cell::new(header.nbinary)]);
    table.add_row(vec![
        Cell::new("MCLUS [Msun]"),
        Cell::new(header.mass_of_cluster),
    ]);
    table.add_row(vec![Cell::new("RVIR [pc]"), Cell::new(header.virial_radius)]);
    table.add_row(vec![
        Cell::new("RTID [pc]"),
        header
            .tidal_radius
            .map_or_else(|| dim_cell("unset"), Cell::new),
    ]);
    table.add_row(vec![Cell::new("Z"), Cell::new(header.metallicity)]);
    table.add_row(vec![
        Cell::new("Central BH [N-body]"),
        Cell::new(report.file.central_bh),
    ]);
    align_column(&mut table, 1, CellAlignment::Right);
    println!("{table}");

    print_type_table(&report.stellar_types);
}

fn print_type_table(types: &[TypeSummary]) {
    if types.is_empty() {
        println!("No single stars.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("k"),
        header_cell("Type"),
        header_cell("Count"),
        header_cell("Mass [N-body]"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    let mut total_count = 0usize;
    let mut total_mass = 0.0;
    for summary in types {
        total_count += summary.count;
        total_mass += summary.mass;
        table.add_row(vec![
            Cell::new(summary.code),
            type_cell(summary.label),
            Cell::new(summary.count),
            Cell::new(format!("{:.6}", summary.mass)),
        ]);
    }
    table.add_row(vec![
        dim_cell("-"),
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_count).add_attribute(Attribute::Bold),
        Cell::new(format!("{total_mass:.6}")).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
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

fn type_cell(label: &str) -> Cell {
    if label == UNKNOWN_TYPE {
        Cell::new(label).fg(Color::Yellow)
    } else {
        Cell::new(label)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).add_attribute(Attribute::Dim)
}
