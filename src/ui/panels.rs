use eframe::egui::{Color32, RichText, Ui};

use bizboard::{DatasetKind, Session};

// ---------------------------------------------------------------------------
// Left side panel – one upload widget per dataset kind
// ---------------------------------------------------------------------------

fn upload_label(kind: DatasetKind) -> &'static str {
    match kind {
        DatasetKind::Finance => "Upload Finance Data",
        DatasetKind::Sales => "Upload Sales Data",
        DatasetKind::Purchase => "Upload Purchase Price Data",
    }
}

/// Render the left upload panel.
pub fn side_panel(ui: &mut Ui, session: &mut Session) {
    ui.heading("Upload Data Section");
    ui.separator();

    for kind in DatasetKind::ALL {
        ui.strong(upload_label(kind));
        ui.horizontal(|ui: &mut Ui| {
            if ui.button("Browse…").clicked() {
                open_file_dialog(session, kind);
            }
            let loaded = session.slot(kind).source_name.is_some();
            if loaded && ui.small_button("Clear").clicked() {
                session.clear(kind);
            }
        });

        let slot = session.slot(kind);
        if let Some(name) = &slot.source_name {
            let text = RichText::new(name).small();
            if slot.error.is_some() {
                ui.label(text.color(Color32::RED));
            } else {
                ui.label(text);
            }
        }
        ui.add_space(8.0);
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(session: &mut Session, kind: DatasetKind) {
    let file = rfd::FileDialog::new()
        .set_title(upload_label(kind))
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Uploading {} as {kind} data", path.display());
        session.upload_file(kind, &path);
    }
}
