use std::collections::BTreeMap;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use bizboard::color::ColorMap;
use bizboard::data::aggregate::histogram;
use bizboard::state::UploadSlot;
use bizboard::{
    render_all, CellValue, ChartError, ChartKind, ChartSink, ChartSpec, DatasetKind, SchemaError,
    Session,
};

use super::table::dataset_table;

const PLOT_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// egui_plot sink
// ---------------------------------------------------------------------------

/// Draws chart specs into the current `Ui` with egui_plot.
struct PlotSink<'a> {
    ui: &'a mut Ui,
    color_map: Option<&'a ColorMap>,
}

fn column(spec: &ChartSpec, name: Option<&str>) -> Result<usize, ChartError> {
    let name = name.ok_or_else(|| SchemaError::MissingColumn(format!("{} (y)", spec.title)))?;
    Ok(spec.data.require_column(name)?)
}

/// `(position, label, value)` per row with a numeric y.
fn categorical(spec: &ChartSpec) -> Result<Vec<(f64, String, f64)>, ChartError> {
    let x = column(spec, Some(spec.x.as_str()))?;
    let y = column(spec, spec.y.as_deref())?;
    let points: Vec<(f64, String, f64)> = spec
        .data
        .rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| Some((i as f64, row[x].to_string(), row[y].as_f64()?)))
        .collect();
    if points.is_empty() {
        return Err(ChartError::NoData(spec.title.clone()));
    }
    Ok(points)
}

fn base_plot(spec: &ChartSpec) -> Plot<'_> {
    Plot::new(format!("{:?}-{}", spec.kind, spec.title))
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(spec.x_label.clone())
        .y_axis_label(spec.y_label.clone())
        .allow_scroll(false)
}

impl PlotSink<'_> {
    fn bar(&mut self, spec: &ChartSpec) -> Result<(), ChartError> {
        let bars: Vec<Bar> = categorical(spec)?
            .into_iter()
            .map(|(pos, label, value)| Bar::new(pos, value).width(0.7).name(label))
            .collect();
        let chart = BarChart::new(bars).name(&spec.y_label).color(Color32::LIGHT_BLUE);
        let plot = base_plot(spec);
        plot.show(self.ui, |plot_ui| plot_ui.bar_chart(chart));
        Ok(())
    }

    fn line(&mut self, spec: &ChartSpec) -> Result<(), ChartError> {
        let data = categorical(spec)?;
        let first = data.first().map(|d| d.1.clone()).unwrap_or_default();
        let last = data.last().map(|d| d.1.clone()).unwrap_or_default();
        let points: PlotPoints = data.iter().map(|(pos, _, v)| [*pos, *v]).collect();
        let line = Line::new(points).name(&spec.y_label).width(1.5);
        let plot = base_plot(spec);
        plot.show(self.ui, |plot_ui| plot_ui.line(line));
        self.ui.small(format!("{first} … {last}"));
        Ok(())
    }

    fn scatter(&mut self, spec: &ChartSpec) -> Result<(), ChartError> {
        let x = column(spec, Some(spec.x.as_str()))?;
        let y = column(spec, spec.y.as_deref())?;
        let color = spec.color.as_deref().map(|c| spec.data.require_column(c)).transpose()?;

        let mut groups: BTreeMap<CellValue, Vec<[f64; 2]>> = BTreeMap::new();
        for row in &spec.data.rows {
            let (Some(px), Some(py)) = (row[x].as_f64(), row[y].as_f64()) else {
                continue;
            };
            let key = color.map(|c| row[c].clone()).unwrap_or(CellValue::Missing);
            groups.entry(key).or_default().push([px, py]);
        }
        if groups.is_empty() {
            return Err(ChartError::NoData(spec.title.clone()));
        }

        let color_map = self.color_map;
        let plot = base_plot(spec);
        plot.show(self.ui, |plot_ui| {
            for (key, pts) in groups {
                let c = color_map
                    .map(|cm| cm.color_for(&key))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let points: PlotPoints = pts.into_iter().collect();
                plot_ui.points(Points::new(points).name(key.to_string()).color(c).radius(3.0));
            }
        });
        Ok(())
    }

    fn histogram(&mut self, spec: &ChartSpec) -> Result<(), ChartError> {
        let x = column(spec, Some(spec.x.as_str()))?;
        let values = spec.data.numeric_values(x);
        let bins = histogram(&values, spec.bins.unwrap_or(30));
        if bins.is_empty() {
            return Err(ChartError::NoData(spec.title.clone()));
        }
        let bars: Vec<Bar> = bins
            .iter()
            .map(|b| {
                let width = (b.end - b.start).max(f64::EPSILON);
                Bar::new(b.start + width / 2.0, b.count as f64).width(width)
            })
            .collect();
        let chart = BarChart::new(bars).name(&spec.x_label).color(Color32::LIGHT_BLUE);
        let plot = base_plot(spec);
        plot.show(self.ui, |plot_ui| plot_ui.bar_chart(chart));
        Ok(())
    }
}

impl ChartSink for PlotSink<'_> {
    fn render(&mut self, spec: &ChartSpec) -> Result<(), ChartError> {
        self.ui.strong(&spec.title);
        match spec.kind {
            ChartKind::Bar => self.bar(spec),
            ChartKind::Line => self.line(spec),
            ChartKind::Scatter => self.scatter(spec),
            ChartKind::Histogram => self.histogram(spec),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset sections (central panel)
// ---------------------------------------------------------------------------

/// Render every dataset slot: errors, preview, summary and charts.
pub fn dataset_sections(ui: &mut Ui, session: &Session) {
    let any = DatasetKind::ALL
        .iter()
        .any(|k| session.slot(*k).source_name.is_some());
    if !any {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Upload a CSV file to get started  (side panel)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for kind in DatasetKind::ALL {
                dataset_section(ui, kind, session.slot(kind));
            }
        });
}

fn dataset_section(ui: &mut Ui, kind: DatasetKind, slot: &UploadSlot) {
    if let Some(err) = &slot.error {
        ui.label(RichText::new(err).color(Color32::RED));
        ui.separator();
        return;
    }
    let Some(presentation) = &slot.presentation else {
        return;
    };

    egui::CollapsingHeader::new(RichText::new(&presentation.heading).heading())
        .id_salt(kind)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            if !presentation.warnings.is_empty() {
                ui.small(format!(
                    "{} value(s) could not be converted and are shown as missing",
                    presentation.warnings.len()
                ));
            }
            dataset_table(ui, &format!("{kind}-preview"), &presentation.preview);
            if let Some(summary) = &presentation.summary {
                ui.add_space(6.0);
                dataset_table(ui, &format!("{kind}-summary"), summary);
            }
            ui.add_space(6.0);

            let mut sink = PlotSink {
                ui: &mut *ui,
                color_map: slot.color_map.as_ref(),
            };
            let reports = render_all(&mut sink, &presentation.charts);
            for msg in reports.iter().filter_map(|r| r.message()) {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
        });
    ui.separator();
}
