// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell hosting the drop zones.
//! Handles layout, the delivered-batch log, and the background read workers.

pub mod components;

use eframe::egui;
use time::format_description::well_known::Rfc3339;

use crate::models::config::ConfigError;
use crate::mvu::{self, AppModel, Command, Delivery, Msg, STATUS_INDICATOR};
use crate::ui::components::drop_zone;
use crate::utils::file_drop_supported;

/// Longest content preview shown per record.
const PREVIEW_CHARS: usize = 96;

/// Stateful egui application demonstrating independent drop zones.
pub struct FileDropApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
    delivery_rx: crossbeam_channel::Receiver<Delivery>,
}

impl FileDropApp {
    /// Bind the demo zones and start the read workers.
    ///
    /// # Errors
    ///
    /// Propagates a configuration error from binding a zone.
    pub fn new() -> Result<Self, ConfigError> {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();
        let (delivery_tx, delivery_rx) = crossbeam_channel::unbounded::<Delivery>();

        let zones = mvu::demo_zones(delivery_tx)?;

        // One read per dropped file, no cap; the pool bounds how many run at once.
        let threads = std::thread::available_parallelism()
            .map(|n| n.get().max(2))
            .unwrap_or(2);
        log::debug!("starting {threads} read worker(s)");
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd);
                    let _ = msg_tx.send(msg);
                }
            });
        }

        Ok(Self {
            model: AppModel {
                zones,
                ..Default::default()
            },
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
            delivery_rx,
        })
    }
}

impl eframe::App for FileDropApp {
    /// Drain worker results and delivered batches, apply messages, then render the frame.
    fn ui(&mut self, ui: &mut egui::Ui, _frame: &mut eframe::Frame) {
        let ctx = ui.ctx().clone();
        // Pull messages produced by the read workers.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }
        while let Ok(delivery) = self.delivery_rx.try_recv() {
            self.inbox.push(Msg::Delivered(delivery));
        }

        // Apply in arrival order; new messages from views land in the next frame.
        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }
        // Callbacks may have fired while applying messages.
        while let Ok(delivery) = self.delivery_rx.try_recv() {
            self.inbox.push(Msg::Delivered(delivery));
        }
        if !self.inbox.is_empty() || self.model.pending_commands > 0 {
            ctx.request_repaint();
        }

        egui::Panel::top("top_bar").show_inside(ui, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("File Drop");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::widgets::global_theme_preference_switch(ui);
                    ui.separator();
                    self.render_support_flag(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(&ctx);

        egui::Panel::bottom("status_panel")
            .resizable(false)
            .show_inside(ui, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show_inside(ui, |ui| {
            ui.add_space(8.0);
            self.render_zones(ui);
            ui.add_space(12.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_deliveries(ui);
            });
        });
    }
}

impl FileDropApp {
    /// Lay the zones out side by side and forward their messages.
    fn render_zones(&mut self, ui: &mut egui::Ui) {
        let zone_count = self.model.zones.len();
        ui.columns(zone_count.max(1), |columns| {
            for (index, column) in columns.iter_mut().enumerate().take(zone_count) {
                let msgs = drop_zone::view(column, &self.model.zones[index]);
                self.inbox.extend(
                    msgs.into_iter()
                        .map(|msg| Msg::DropZone { zone: index, msg }),
                );
            }
        });
    }

    /// List delivered batches with a short preview of each record.
    fn render_deliveries(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Delivered batches");
            if !self.model.deliveries.is_empty()
                && ui
                    .button(egui_phosphor::regular::TRASH_SIMPLE)
                    .on_hover_text("Clear")
                    .clicked()
            {
                self.inbox.push(Msg::ClearDeliveries);
            }
        });
        ui.add_space(4.0);

        if self.model.deliveries.is_empty() {
            ui.label(egui::RichText::new("Nothing dropped yet").color(egui::Color32::from_gray(150)));
            return;
        }

        for delivery in self.model.deliveries.iter().rev() {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(egui::RichText::new(format!("{} {}", delivery.zone, delivery.batch)).strong());
                for record in &delivery.records {
                    let modified = record
                        .last_modified
                        .and_then(|t| t.format(&Rfc3339).ok())
                        .unwrap_or_else(|| "unknown".to_string());
                    ui.label(format!(
                        "{} {} | {} | {} | modified {}",
                        egui_phosphor::regular::FILE,
                        record.name,
                        record.mime,
                        format_bytes(record.size),
                        modified
                    ));
                    ui.label(
                        egui::RichText::new(preview(&record.data))
                            .small()
                            .monospace()
                            .color(egui::Color32::from_gray(102)),
                    );
                }
                for (name, cause) in &delivery.failures {
                    ui.label(
                        egui::RichText::new(format!(
                            "{} {name}: {cause}",
                            egui_phosphor::regular::WARNING
                        ))
                        .color(egui::Color32::from_rgb(232, 89, 12)),
                    );
                }
            });
            ui.add_space(4.0);
        }
    }

    fn render_support_flag(&self, ui: &mut egui::Ui) {
        let text = if file_drop_supported() {
            "OS file drop available"
        } else {
            "OS file drop unavailable"
        };
        ui.label(egui::RichText::new(text).small().color(egui::Color32::from_gray(110)));
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Read error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render the shared hover indicator and the latest status message.
    fn render_status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let color = if self.model.indicator_active(STATUS_INDICATOR) {
                ui.visuals().selection.stroke.color
            } else {
                egui::Color32::from_gray(150)
            };
            ui.label(egui::RichText::new(egui_phosphor::regular::DOWNLOAD_SIMPLE).color(color))
                .on_hover_text("Lit while files hover over a zone that targets the status bar");

            if let Some(text) = &self.model.status {
                let display = if self.model.pending_commands > 0 {
                    format!("{}  ({} working…)", text, self.model.pending_commands)
                } else {
                    text.to_string()
                };
                ui.label(egui::RichText::new(display).color(egui::Color32::from_gray(68)));
                if self.model.pending_commands > 0 {
                    ui.add(egui::Spinner::new().size(14.0))
                        .on_hover_text(format!(
                            "{} read(s) running in background",
                            self.model.pending_commands
                        ));
                }
            }
        });
    }
}

/// First characters of a record's content, on one line.
fn preview(data: &str) -> String {
    let line: String = data
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .take(PREVIEW_CHARS)
        .collect();
    if data.chars().count() > PREVIEW_CHARS {
        format!("{line}…")
    } else {
        line
    }
}

/// Human-readable formatting for byte sizes with binary units.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::{PREVIEW_CHARS, format_bytes, preview};

    #[test]
    fn format_bytes_uses_binary_units() {
        assert_eq!(format_bytes(10), "10 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn preview_truncates_and_flattens() {
        assert_eq!(preview("a\nb"), "a b");
        let long = "x".repeat(PREVIEW_CHARS + 5);
        let shown = preview(&long);
        assert!(shown.ends_with('…'));
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 1);
    }
}
