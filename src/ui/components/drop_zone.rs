// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Drop zone component: hover feedback, drop handling, and fan-out of file reads.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::models::batch::{BatchId, BatchReport, PendingBatch};
use crate::models::config::{ConfigError, ContentOptions, DropConfig, DropZoneOptions, HoverTarget};
use crate::models::file_record::{DroppedFile, ReadOutcome};

/// Quiet period after the last drag-over before the hover class is removed.
pub const HOVER_EXIT_DELAY: Duration = Duration::from_millis(100);

/// Temp-memory key holding the zone that currently owns an OS drag.
const DRAG_OWNER_KEY: &str = "filedrop::drag_owner";

/// State of one bound drop surface. Hover timing is private to each zone.
#[derive(Debug)]
pub struct DropZoneModel {
    title: String,
    config: DropConfig,
    over: bool,
    exit_deadline: Option<Instant>,
    next_batch: u64,
    pending: BTreeMap<BatchId, PendingBatch>,
    last_report: Option<BatchReport>,
}

/// Messages emitted by the drop zone view and by finished reads.
#[derive(Clone, Debug)]
pub enum DropZoneMsg {
    DragEnter,
    DragOver { at: Instant },
    DragLeave,
    Tick { now: Instant },
    Drop(Vec<DroppedFile>),
    RequestPickFiles,
    FilesPicked(Vec<PathBuf>),
    ReadFinished {
        batch: BatchId,
        index: usize,
        outcome: ReadOutcome,
    },
}

/// Side effects requested by the drop zone, executed off the UI path.
#[derive(Debug)]
pub enum DropZoneCommand {
    PickFiles,
    ReadFile {
        batch: BatchId,
        index: usize,
        file: DroppedFile,
        options: ContentOptions,
    },
}

/// User-facing events for status/error surfaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropZoneEvent {
    /// Message text to display.
    pub message: String,
    /// Whether the message represents an error.
    pub is_error: bool,
}

impl DropZoneModel {
    /// Bind a drop zone with the given options.
    ///
    /// # Errors
    ///
    /// Fails before any state exists when the options carry no completion callback.
    pub fn bind(title: impl Into<String>, options: DropZoneOptions) -> Result<Self, ConfigError> {
        let config = options.resolve()?;
        let title = title.into();
        log::debug!("bound drop zone {title:?}: {config:?}");
        Ok(Self {
            title,
            config,
            over: false,
            exit_deadline: None,
            next_batch: 0,
            pending: BTreeMap::new(),
            last_report: None,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn config(&self) -> &DropConfig {
        &self.config
    }

    /// Whether files are currently hovering over this zone.
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// The hover class, while it is applied.
    pub fn active_class(&self) -> Option<&str> {
        self.over.then(|| self.config.over_class())
    }

    pub fn hover_target(&self) -> &HoverTarget {
        self.config.add_class_to()
    }

    /// When the hover class will be removed if no further drag-over arrives.
    pub fn exit_deadline(&self) -> Option<Instant> {
        self.exit_deadline
    }

    /// Number of drops whose reads have not all resolved yet.
    pub fn pending_batches(&self) -> usize {
        self.pending.len()
    }

    pub fn last_report(&self) -> Option<&BatchReport> {
        self.last_report.as_ref()
    }
}

/// Apply a message to the drop zone. Returns a user-facing event when relevant.
pub fn update(
    model: &mut DropZoneModel,
    msg: DropZoneMsg,
    cmds: &mut Vec<DropZoneCommand>,
) -> Option<DropZoneEvent> {
    match msg {
        DropZoneMsg::DragEnter => {
            model.over = true;
            None
        }
        DropZoneMsg::DragOver { at } => {
            model.exit_deadline = Some(at + HOVER_EXIT_DELAY);
            None
        }
        DropZoneMsg::DragLeave => {
            model.over = false;
            model.exit_deadline = None;
            None
        }
        DropZoneMsg::Tick { now } => {
            if model.exit_deadline.is_some_and(|deadline| deadline <= now) {
                model.exit_deadline = None;
                model.over = false;
            }
            None
        }
        DropZoneMsg::Drop(files) => {
            model.over = false;
            model.exit_deadline = None;
            start_batch(model, files, cmds)
        }
        DropZoneMsg::RequestPickFiles => {
            cmds.push(DropZoneCommand::PickFiles);
            None
        }
        DropZoneMsg::FilesPicked(paths) => {
            let files = paths.into_iter().map(DroppedFile::from_path).collect();
            start_batch(model, files, cmds)
        }
        DropZoneMsg::ReadFinished {
            batch,
            index,
            outcome,
        } => finish_read(model, batch, index, outcome),
    }
}

/// Reserve a slot per file and request one read each, in drop order.
fn start_batch(
    model: &mut DropZoneModel,
    files: Vec<DroppedFile>,
    cmds: &mut Vec<DropZoneCommand>,
) -> Option<DropZoneEvent> {
    if files.is_empty() {
        log::debug!("drop on {:?} carried no files", model.title);
        return None;
    }

    let id = BatchId(model.next_batch);
    model.next_batch += 1;
    let count = files.len();
    model.pending.insert(id, PendingBatch::new(id, count));
    log::debug!("drop zone {:?}: batch {id} with {count} file(s)", model.title);

    let options = model.config.content_options();
    for (index, file) in files.into_iter().enumerate() {
        cmds.push(DropZoneCommand::ReadFile {
            batch: id,
            index,
            file,
            options,
        });
    }

    Some(DropZoneEvent {
        message: format!("Reading {count} file(s)..."),
        is_error: false,
    })
}

/// Record one read; on the last one, deliver the batch exactly once.
fn finish_read(
    model: &mut DropZoneModel,
    batch: BatchId,
    index: usize,
    outcome: ReadOutcome,
) -> Option<DropZoneEvent> {
    let Some(pending) = model.pending.get_mut(&batch) else {
        log::warn!(
            "drop zone {:?}: read for unknown batch {batch}",
            model.title
        );
        return None;
    };
    let report = pending.fill(index, outcome)?;
    model.pending.remove(&batch);

    model.config.deliver(&report);
    let event = match &report {
        BatchReport::Complete(done) => DropZoneEvent {
            message: format!("Read {} file(s) into {}", done.len(), model.title),
            is_error: false,
        },
        BatchReport::Partial(failed) => {
            let names: Vec<&str> = failed.failures().map(|(name, _)| name).collect();
            DropZoneEvent {
                message: format!(
                    "Read {} of {} file(s); failed: {}",
                    failed.loaded().count(),
                    failed.outcomes().len(),
                    names.join(", ")
                ),
                is_error: true,
            }
        }
    };
    model.last_report = Some(report);
    Some(event)
}

/// Convert an egui drop into a host-agnostic description.
///
/// Returns `None` when the host provided neither bytes nor a path.
pub fn dropped_file_from_egui(file: &egui::DroppedFile) -> Option<DroppedFile> {
    let mut dropped = if let Some(bytes) = &file.bytes {
        let name = if file.name.is_empty() {
            file.path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "file".to_string())
        } else {
            file.name.clone()
        };
        DroppedFile::from_bytes(name, file.mime.clone(), bytes.clone())
    } else if let Some(path) = &file.path {
        let mut dropped = DroppedFile::from_path(path.clone());
        if !file.mime.is_empty() {
            dropped.mime = file.mime.clone();
        }
        dropped
    } else {
        log::warn!("dropped item {:?} has neither bytes nor a path", file.name);
        return None;
    };
    if file.last_modified.is_some() {
        dropped.last_modified = file.last_modified;
    }
    Some(dropped)
}

/// Whether this zone is the target of the current drag.
///
/// With a pointer position only the zone under the pointer qualifies. Without one, the
/// zone that last claimed the drag keeps it, or the first zone to see it claims it.
fn claims_drag(
    zone_id: egui::Id,
    rect: egui::Rect,
    pointer: Option<egui::Pos2>,
    owner: Option<egui::Id>,
) -> bool {
    match pointer {
        Some(pos) => rect.contains(pos),
        None => owner.is_none_or(|id| id == zone_id),
    }
}

/// Render the drop surface and translate egui drag state into messages.
pub fn view(ui: &mut egui::Ui, model: &DropZoneModel) -> Vec<DropZoneMsg> {
    let mut msgs = Vec::new();

    let visuals = ui.visuals().clone();
    let highlighted = model.is_over() && *model.hover_target() == HoverTarget::Surface;
    let (fill, stroke) = if highlighted {
        (
            visuals.selection.bg_fill.gamma_multiply(0.25),
            visuals.selection.stroke,
        )
    } else {
        (visuals.panel_fill, visuals.window_stroke())
    };

    let frame = egui::Frame::new()
        .fill(fill)
        .stroke(stroke)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_min_height(140.0);
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{} {}",
                        egui_phosphor::regular::UPLOAD_SIMPLE,
                        model.title()
                    ))
                    .heading(),
                );
                ui.label(
                    egui::RichText::new("Drop files here")
                        .small()
                        .color(egui::Color32::from_gray(120)),
                );
                ui.add_space(6.0);
                if ui
                    .button(format!("{} Browse...", egui_phosphor::regular::FOLDER_OPEN))
                    .on_hover_text("Pick files instead of dropping them")
                    .clicked()
                {
                    msgs.push(DropZoneMsg::RequestPickFiles);
                }
                if model.pending_batches() > 0 {
                    ui.add_space(4.0);
                    ui.add(egui::Spinner::new().size(14.0));
                }
                if let Some(report) = model.last_report() {
                    ui.add_space(4.0);
                    ui.label(
                        egui::RichText::new(format!(
                            "Last drop {}: {} file(s)",
                            report.id(),
                            report.file_count()
                        ))
                        .small()
                        .color(egui::Color32::from_gray(102)),
                    );
                }
            });
        });

    let rect = frame.response.rect;
    let zone_id = ui.make_persistent_id(("drop_zone", model.title()));
    let owner_key = egui::Id::new(DRAG_OWNER_KEY);
    let (hovering, dropped, pointer) = ui.input(|i| {
        (
            !i.raw.hovered_files.is_empty(),
            i.raw.dropped_files.clone(),
            i.pointer.hover_pos(),
        )
    });
    let owner: Option<egui::Id> = ui.data(|d| d.get_temp(owner_key));
    let claims = claims_drag(zone_id, rect, pointer, owner);

    if hovering || !dropped.is_empty() {
        if claims {
            ui.data_mut(|d| d.insert_temp(owner_key, zone_id));
        }
    } else if owner == Some(zone_id) {
        ui.data_mut(|d| d.remove::<egui::Id>(owner_key));
    }

    if hovering {
        if claims {
            if !model.is_over() {
                msgs.push(DropZoneMsg::DragEnter);
            }
            msgs.push(DropZoneMsg::DragOver { at: Instant::now() });
        } else if model.is_over() {
            msgs.push(DropZoneMsg::DragLeave);
        }
    }

    if !dropped.is_empty() && claims {
        let files = dropped.iter().filter_map(dropped_file_from_egui).collect();
        msgs.push(DropZoneMsg::Drop(files));
    }

    if model.exit_deadline().is_some() {
        msgs.push(DropZoneMsg::Tick {
            now: Instant::now(),
        });
        ui.ctx().request_repaint_after(HOVER_EXIT_DELAY);
    }

    msgs
}
