use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use odi_cli::pipeline::PipelineResult;
use odi_ingest::Spreadsheet;

use crate::commands::Destination;

// Tables go to stderr so JSON on stdout stays machine-readable.

pub fn print_summary(result: &PipelineResult, destination: &Destination) {
    eprintln!("Document: {}", result.document_id);
    eprintln!("Worksheet: {} ({} rows)", result.worksheet, result.rows);
    eprintln!("Output: {destination}");

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Test"),
        header_cell("Patients"),
        header_cell("Encounters"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for test in &result.tests {
        table.add_row(vec![
            Cell::new(&test.id).fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(test.patients),
            count_cell(test.encounters),
        ]);
    }
    table.add_row(vec![
        Cell::new(format!("TOTAL ({})", result.summary.tests))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.summary.patients).add_attribute(Attribute::Bold),
        Cell::new(result.summary.encounters).add_attribute(Attribute::Bold),
    ]);
    eprintln!("{table}");
}

pub fn print_worksheets(spreadsheet: &Spreadsheet) {
    eprintln!("Document: {} ({})", spreadsheet.title, spreadsheet.id);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Worksheet"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (index, worksheet) in spreadsheet.worksheets.iter().enumerate() {
        let columns = worksheet
            .rows
            .first()
            .map(|row| row.columns().collect::<Vec<_>>().join(", "));
        let title = if index == 0 {
            Cell::new(&worksheet.title).add_attribute(Attribute::Bold)
        } else {
            dim_cell(&worksheet.title)
        };
        table.add_row(vec![
            Cell::new(index + 1),
            title,
            Cell::new(worksheet.rows.len()),
            columns.map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    eprintln!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
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

fn count_cell(count: usize) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
