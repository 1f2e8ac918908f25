use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::AnnotateResult;

pub fn print_summary(result: &AnnotateResult) {
    println!("Clinical rows: {}", result.clinical_rows);
    if let Some(path) = &result.annotations_path {
        println!("Annotations: {}", path.display());
    }
    if let Some(path) = &result.unmatched_path {
        println!("Unmatched report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Level"),
        header_cell("Evidence"),
        header_cell("Matches"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for ((level, evidence), count) in &result.evidence_counts {
        table.add_row(vec![
            Cell::new(level).fg(Color::Blue),
            Cell::new(evidence),
            Cell::new(count),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("All evidence").fg(Color::Cyan),
        Cell::new(result.annotation_rows).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if result.unmatched_rows > 0 {
        println!(
            "Unmatched inputs: {} (see the unmatched report)",
            result.unmatched_rows
        );
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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
