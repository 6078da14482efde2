use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use bizboard::{CellValue, Dataset};

fn cell_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Number(v) if v.fract() != 0.0 => format!("{v:.2}"),
        other => other.to_string(),
    }
}

/// Render a dataset as a striped, non-scrolling table.
pub fn dataset_table(ui: &mut Ui, id: &str, ds: &Dataset) {
    if ds.columns.is_empty() {
        return;
    }
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .columns(Column::auto().at_least(60.0), ds.columns.len())
            .header(20.0, |mut header| {
                for name in &ds.columns {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for row in &ds.rows {
                    body.row(18.0, |mut table_row| {
                        for cell in row {
                            table_row.col(|ui| {
                                ui.label(cell_text(cell));
                            });
                        }
                    });
                }
            });
    });
}
