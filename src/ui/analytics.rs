//! Page analytics block: a view-count line chart over the recorded dates.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single charted day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayViews {
    pub date: String,
    pub views: u64,
}

/// Expand the sparse view-count map into a continuous day series between
/// its first and last recorded dates, filling gaps with zero-view days.
pub fn day_series(date_view_count: &BTreeMap<String, u64>) -> Vec<DayViews> {
    let mut parsed: Vec<(NaiveDate, u64)> = date_view_count
        .iter()
        .filter_map(|(date, views)| {
            NaiveDate::parse_from_str(date, DATE_FORMAT)
                .ok()
                .map(|d| (d, *views))
        })
        .collect();
    parsed.sort_by_key(|(date, _)| *date);

    let (Some((first, _)), Some((last, _))) = (parsed.first().copied(), parsed.last().copied())
    else {
        return Vec::new();
    };

    let counts: BTreeMap<NaiveDate, u64> = parsed.into_iter().collect();
    let mut series = Vec::new();
    let mut day = first;
    while day <= last {
        series.push(DayViews {
            date: day.format(DATE_FORMAT).to_string(),
            views: counts.get(&day).copied().unwrap_or(0),
        });
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    series
}

/// Render the analytics block.
pub fn render_analytics(
    ui: &mut Ui,
    date_view_count: &BTreeMap<String, u64>,
    premium: bool,
    index: usize,
) {
    if !premium {
        egui::Frame::new()
            .fill(ui.visuals().faint_bg_color)
            .stroke(egui::Stroke::new(1.0, ui.visuals().weak_text_color()))
            .inner_margin(egui::Margin::same(12))
            .corner_radius(egui::CornerRadius::same(4))
            .show(ui, |ui| {
                ui.label(RichText::new("\u{1F512} Page analytics").strong());
                ui.label("Upgrade your account to unlock view statistics.");
            });
        return;
    }

    let series = day_series(date_view_count);
    if series.is_empty() {
        ui.label(RichText::new("No views recorded yet").weak());
        return;
    }

    let total: u64 = series.iter().map(|d| d.views).sum();
    ui.horizontal(|ui| {
        ui.label(RichText::new("Page views").strong());
        ui.label(
            RichText::new(format!(
                "{} \u{2013} {}  ({} total)",
                series[0].date,
                series[series.len() - 1].date,
                total
            ))
            .weak(),
        );
    });

    let points: PlotPoints = series
        .iter()
        .enumerate()
        .map(|(i, day)| [i as f64, day.views as f64])
        .collect();

    Plot::new(("page_views", index))
        .height(200.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show_x(false)
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new("views", points)
                    .color(Color32::from_rgb(25, 118, 210))
                    .width(2.0),
            );
        });

    // Most recent days as a small table under the chart
    use egui_extras::{Column, TableBuilder};
    let recent: Vec<&DayViews> = series.iter().rev().take(7).collect();

    ui.push_id(("view_table", index), |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(100.0))
            .column(Column::auto().at_least(60.0))
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Date");
                });
                header.col(|ui| {
                    ui.strong("Views");
                });
            })
            .body(|mut body| {
                for day in recent {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(&day.date);
                        });
                        row.col(|ui| {
                            ui.label(day.views.to_string());
                        });
                    });
                }
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn views(entries: &[(&str, u64)]) -> BTreeMap<String, u64> {
        entries
            .iter()
            .map(|(date, count)| (date.to_string(), *count))
            .collect()
    }

    #[test]
    fn test_day_series_fills_gaps_with_zero() {
        let series = day_series(&views(&[("2026-08-01", 4), ("2026-08-04", 2)]));
        let flat: Vec<(&str, u64)> = series.iter().map(|d| (d.date.as_str(), d.views)).collect();
        assert_eq!(
            flat,
            vec![
                ("2026-08-01", 4),
                ("2026-08-02", 0),
                ("2026-08-03", 0),
                ("2026-08-04", 2),
            ]
        );
    }

    #[test]
    fn test_day_series_empty_input() {
        assert!(day_series(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_day_series_skips_malformed_dates() {
        let series = day_series(&views(&[("not-a-date", 9), ("2026-08-01", 1)]));
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].views, 1);
    }
}
