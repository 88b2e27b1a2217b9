//! Table and CSV rendering of built grids.

use std::io::Write;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use isagrid_grid::{ColumnDef, ColumnLayout, GroupKind, RowRecord};

/// Schema columns shown in the grid, in layout order.
fn visible_leaves(layout: &ColumnLayout) -> Vec<&ColumnDef> {
    layout
        .leaves()
        .filter(|leaf| !leaf.hide && leaf.col.is_some())
        .collect()
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

/// One line per leaf column with its resolved properties.
pub fn layout_table(layout: &ColumnLayout) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Width"),
        header_cell("Hidden"),
        header_cell("Editor"),
    ]);
    apply_table_style(&mut table);
    for group in &layout.groups {
        for leaf in &group.children {
            let group_cell = match group.kind {
                GroupKind::Node => Cell::new(&group.header_name),
                _ => Cell::new(&group.header_name).fg(Color::DarkGrey),
            };
            let hidden = if leaf.hide {
                Cell::new("yes").fg(Color::Yellow)
            } else {
                Cell::new("no")
            };
            table.add_row(vec![
                group_cell,
                Cell::new(&leaf.header_name),
                Cell::new(leaf.col_type.map_or("-", |col_type| col_type.as_str())),
                Cell::new(leaf.width),
                hidden,
                Cell::new(
                    leaf.editor
                        .map_or_else(|| "-".to_string(), |editor| format!("{editor:?}")),
                ),
            ]);
        }
    }
    table
}

/// Visible columns of every row, rendered for display.
pub fn rows_table(layout: &ColumnLayout, rows: &[RowRecord]) -> Table {
    let leaves = visible_leaves(layout);
    let mut table = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(leaves.iter().map(|leaf| header_cell(&leaf.header_name)));
    table.set_header(header);
    apply_table_style(&mut table);
    for row in rows {
        let mut cells = vec![Cell::new(row.row_num)];
        cells.extend(leaves.iter().map(|leaf| {
            let text = leaf
                .col
                .and_then(|col| row.display(col))
                .unwrap_or_default();
            Cell::new(text)
        }));
        table.add_row(cells);
    }
    table
}

/// Write the visible columns as CSV with a header line.
pub fn write_csv<W: Write>(layout: &ColumnLayout, rows: &[RowRecord], out: W) -> csv::Result<()> {
    let leaves = visible_leaves(layout);
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(leaves.iter().map(|leaf| leaf.header_name.as_str()))?;
    for row in rows {
        let record: Vec<String> = leaves
            .iter()
            .map(|leaf| {
                leaf.col
                    .and_then(|col| row.display(col))
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
