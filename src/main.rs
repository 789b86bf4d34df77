#![deny(missing_docs)]

//! Entry point for the OrbitalEye desktop app.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use std::sync::Arc;

use eframe::egui;
use orbitaleye::classifier::GeminiClassifier;
use orbitaleye::config::{self, AppConfig};
use orbitaleye::egui_app::controller::EguiController;
use orbitaleye::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use orbitaleye::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let (config, config_warning) = match config::load_or_default() {
        Ok(config) => (config, None),
        Err(err) => {
            tracing::warn!("Falling back to default settings: {err}");
            (
                AppConfig::default(),
                Some(format!("Using default settings: {err}")),
            )
        }
    };
    let controller = build_controller(&config, config_warning);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("OrbitalEye")
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size(MIN_VIEWPORT_SIZE)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "OrbitalEye",
        native_options,
        Box::new(move |cc| {
            let app: Box<dyn eframe::App> = match controller {
                Ok(mut controller) => {
                    controller.set_repaint_context(cc.egui_ctx.clone());
                    Box::new(EguiApp::new(controller))
                }
                Err(message) => Box::new(LaunchError { message }),
            };
            Ok(app)
        }),
    )?;
    Ok(())
}

fn build_controller(
    config: &AppConfig,
    warning: Option<String>,
) -> Result<EguiController, String> {
    let classifier = GeminiClassifier::new(&config.classifier, &config.network)
        .map_err(|err| format!("Invalid classifier settings: {err}"))?;
    tracing::info!("Classifier endpoint: {}", classifier.url());
    let key_warning = classifier.missing_api_key_warning();
    if let Some(message) = &key_warning {
        tracing::warn!("{message}");
    }
    let mut controller = EguiController::new(Arc::new(classifier));
    for warning in [warning, key_warning].into_iter().flatten() {
        controller.report_warning(warning);
    }
    Ok(controller)
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start OrbitalEye");
                ui.label(&self.message);
            });
        });
    }
}
