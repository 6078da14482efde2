use eframe::egui;

use bizboard::{DashboardConfig, Session};

use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BizboardApp {
    pub session: Session,
}

impl BizboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            session: Session::new(config),
        }
    }
}

impl eframe::App for BizboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Left side panel: uploads ----
        egui::SidePanel::left("upload_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.session);
            });

        // ---- Central panel: one section per dataset ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Comprehensive Data Processing Application");
            ui.separator();
            plot::dataset_sections(ui, &self.session);
        });
    }
}
