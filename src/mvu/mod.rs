// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring drop zones, their messages, and commands.

use crossbeam_channel::Sender;

use crate::models::batch::{BatchId, DropBatch, FailedBatch};
use crate::models::config::{ConfigError, DropZoneOptions, HoverTarget};
use crate::models::file_record::FileRecord;
use crate::reader;
use crate::ui::components::drop_zone::{self, DropZoneCommand, DropZoneModel, DropZoneMsg};

/// Name of the shared indicator lit by zones that do not highlight themselves.
pub const STATUS_INDICATOR: &str = "status";

/// A batch handed to a zone callback, kept for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub zone: String,
    pub batch: BatchId,
    pub records: Vec<FileRecord>,
    /// `(name, cause)` of reads that failed.
    pub failures: Vec<(String, String)>,
}

impl Delivery {
    fn complete(zone: &str, batch: &DropBatch) -> Self {
        Self {
            zone: zone.to_string(),
            batch: batch.id(),
            records: batch.records().to_vec(),
            failures: Vec::new(),
        }
    }

    fn partial(zone: &str, failed: &FailedBatch) -> Self {
        Self {
            zone: zone.to_string(),
            batch: failed.id(),
            records: failed.loaded().cloned().collect(),
            failures: failed
                .failures()
                .map(|(name, cause)| (name.to_string(), cause.to_string()))
                .collect(),
        }
    }
}

/// Top-level application state.
#[derive(Debug, Default)]
pub struct AppModel {
    /// Bound drop zones, addressed by index.
    pub zones: Vec<DropZoneModel>,
    /// Batches delivered so far, newest last.
    pub deliveries: Vec<Delivery>,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    /// Whether any zone targeting the named indicator currently has files over it.
    pub fn indicator_active(&self, name: &str) -> bool {
        self.zones.iter().any(|zone| {
            zone.is_over() && matches!(zone.hover_target(), HoverTarget::Indicator(n) if n == name)
        })
    }
}

/// Application messages routed through the update function.
#[derive(Debug)]
pub enum Msg {
    DropZone { zone: usize, msg: DropZoneMsg },
    Delivered(Delivery),
    ClearDeliveries,
    DismissError,
}

/// Commands represent side-effects executed between frames.
#[derive(Debug)]
pub enum Command {
    DropZone { zone: usize, cmd: DropZoneCommand },
}

/// Bind the two demo zones; their callbacks forward every batch to `deliveries`.
///
/// The first zone keeps full data URLs and lights the shared status indicator; the second
/// decodes text content and highlights itself.
pub fn demo_zones(deliveries: Sender<Delivery>) -> Result<Vec<DropZoneModel>, ConfigError> {
    let raw = DropZoneModel::bind(
        "Data URLs",
        forwarding_options("Data URLs", deliveries.clone())
            .remove_data_uri_scheme(false)
            .add_class_to(HoverTarget::Indicator(STATUS_INDICATOR.to_string())),
    )?;
    let text = DropZoneModel::bind(
        "Decoded text",
        forwarding_options("Decoded text", deliveries).decode_base64(true),
    )?;
    Ok(vec![raw, text])
}

fn forwarding_options(zone: &'static str, tx: Sender<Delivery>) -> DropZoneOptions {
    let err_tx = tx.clone();
    DropZoneOptions::from_callback(move |batch, _| {
        let _ = tx.send(Delivery::complete(zone, batch));
    })
    .on_read_error(move |failed, _| {
        let _ = err_tx.send(Delivery::partial(zone, failed));
    })
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::DropZone { zone, msg } => {
            let Some(target) = model.zones.get_mut(zone) else {
                log::warn!("message for unknown drop zone {zone}");
                return;
            };
            let mut zone_cmds = Vec::new();
            let event = drop_zone::update(target, msg, &mut zone_cmds);
            cmds.extend(
                zone_cmds
                    .into_iter()
                    .map(|cmd| Command::DropZone { zone, cmd }),
            );
            if let Some(event) = event {
                surface_event(model, event.message, event.is_error);
            }
        }
        Msg::Delivered(delivery) => model.deliveries.push(delivery),
        Msg::ClearDeliveries => model.deliveries.clear(),
        Msg::DismissError => model.error = None,
    }
}

/// Execute a command on a worker thread and return the resulting message.
pub fn run_command(cmd: Command) -> Msg {
    match cmd {
        Command::DropZone { zone, cmd } => {
            let msg = match cmd {
                DropZoneCommand::PickFiles => {
                    let files = rfd::FileDialog::new()
                        .set_title("Select files")
                        .pick_files()
                        .unwrap_or_default();
                    DropZoneMsg::FilesPicked(files)
                }
                DropZoneCommand::ReadFile {
                    batch,
                    index,
                    file,
                    options,
                } => DropZoneMsg::ReadFinished {
                    batch,
                    index,
                    outcome: reader::load(&file, options),
                },
            };
            Msg::DropZone { zone, msg }
        }
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}
