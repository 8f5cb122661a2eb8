use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

/// Cell text for a statistic; undefined values render as a dash, never 0.
pub fn format_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "—".to_string(), |v| format!("{v:.2}"))
}

/// Summary statistics, one row per dimension.
pub fn summary_table(ui: &mut Ui, state: &AppState) {
    TableBuilder::new(ui)
        .id_salt("summary_table")
        .striped(true)
        .resizable(false)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(160.0))
        .columns(Column::auto().at_least(70.0), 5)
        .header(22.0, |mut header| {
            for title in ["Dimension", "N", "Mean", "Std", "Min", "Max"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (dim, s) in &state.summary {
                body.row(20.0, |mut row| {
                    row.col(|ui| {
                        ui.label(format!("{} ({})", dim.code(), dim.label()));
                    });
                    row.col(|ui| {
                        ui.label(s.count.to_string());
                    });
                    for value in [s.mean, s.std_dev, s.min, s.max] {
                        row.col(|ui| {
                            ui.label(format_stat(value));
                        });
                    }
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_is_not_rendered_as_zero() {
        assert_eq!(format_stat(None), "—");
        assert_eq!(format_stat(Some(0.0)), "0.00");
        assert_eq!(format_stat(Some(1.23456)), "1.23");
    }
}
