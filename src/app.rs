use crate::color::{ColorLut, ColorScheme};
use crate::export::ExportSink;
use crate::settings::GrowthSettings;
use crate::snapshot::{Snapshot, SnapshotSink};
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};
use tracing::warn;

const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(10);
const MAX_FRAME_INTERVAL: Duration = Duration::from_millis(1000);

/// Playback state of the snapshot stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Playback {
    /// Frames still arriving from the growth thread
    Growing,
    /// Growth finished but queued frames remain
    Replaying,
    /// The final frame is on screen
    Complete,
    /// Growth thread stopped without a final frame
    Stopped,
}

/// Main application state
pub struct App {
    receiver: Receiver<Snapshot>,
    pending: VecDeque<Snapshot>,
    pub current: Option<Snapshot>,
    pub settings: GrowthSettings,
    pub seed: u64,
    pub color_scheme: ColorScheme,
    pub color_lut: ColorLut,
    pub frame_interval: Duration,
    last_advance: Option<Instant>,
    pub frames_received: usize,
    pub frames_shown: usize,
    disconnected: bool,
    pub paused: bool,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    export: Option<ExportSink>,
    final_exported: bool,
    pub export_error: Option<String>,
}

impl App {
    pub fn new(
        receiver: Receiver<Snapshot>,
        settings: GrowthSettings,
        seed: u64,
        color_scheme: ColorScheme,
        frame_interval: Duration,
    ) -> Self {
        Self {
            receiver,
            pending: VecDeque::new(),
            current: None,
            settings,
            seed,
            color_lut: color_scheme.build_lut(),
            color_scheme,
            frame_interval: frame_interval.clamp(MIN_FRAME_INTERVAL, MAX_FRAME_INTERVAL),
            last_advance: None,
            frames_received: 0,
            frames_shown: 0,
            disconnected: false,
            paused: false,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            export: None,
            final_exported: false,
            export_error: None,
        }
    }

    /// Forward every received snapshot to an exporter as well
    pub fn with_export(mut self, export: ExportSink) -> Self {
        self.export = Some(export);
        self
    }

    /// Pull new snapshots and advance playback if a frame interval has passed
    pub fn tick(&mut self) {
        self.receive();
        if self.paused {
            return;
        }
        let due = self
            .last_advance
            .map_or(true, |t| t.elapsed() >= self.frame_interval);
        if due && self.advance() {
            self.last_advance = Some(Instant::now());
        }
    }

    /// Drain the channel without blocking
    pub fn receive(&mut self) {
        loop {
            match self.receiver.try_recv() {
                Ok(snapshot) => {
                    self.frames_received += 1;
                    self.forward_to_export(&snapshot);
                    self.pending.push_back(snapshot);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    break;
                }
            }
        }
    }

    fn forward_to_export(&mut self, snapshot: &Snapshot) {
        let Some(export) = self.export.as_mut() else {
            return;
        };
        match export.emit(snapshot.clone()) {
            Ok(()) => self.final_exported |= snapshot.is_final,
            Err(err) => {
                warn!(%err, "export disabled");
                self.export_error = Some(err.to_string());
                self.export = None;
            }
        }
    }

    /// Forward snapshots still in the channel to the exporter. Returns false
    /// if an export is running and the final snapshot has not reached it.
    pub fn finish_export(&mut self) -> bool {
        self.receive();
        self.export.is_none() || self.final_exported
    }

    /// Show the next queued snapshot. Returns false if none is queued.
    pub fn advance(&mut self) -> bool {
        match self.pending.pop_front() {
            Some(snapshot) => {
                self.current = Some(snapshot);
                self.frames_shown += 1;
                true
            }
            None => false,
        }
    }

    /// Skip the queue and show the newest snapshot
    pub fn jump_to_latest(&mut self) {
        if let Some(latest) = self.pending.pop_back() {
            self.frames_shown += self.pending.len() + 1;
            self.pending.clear();
            self.current = Some(latest);
        }
    }

    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    pub fn playback(&self) -> Playback {
        let current_final = self.current.as_ref().is_some_and(|s| s.is_final);
        if current_final {
            Playback::Complete
        } else if !self.disconnected {
            Playback::Growing
        } else if self.pending.is_empty() {
            Playback::Stopped
        } else {
            Playback::Replaying
        }
    }

    /// Stuck count and target of the frame on screen
    pub fn progress(&self) -> (usize, usize) {
        self.current.as_ref().map_or((1, self.settings.num_particles), |s| {
            (s.stuck_count, s.num_particles)
        })
    }

    /// Distance from the seed that maps to the end of the color gradient
    pub fn color_radius(&self) -> f32 {
        self.settings.spawn_radius as f32
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Halve the frame interval
    pub fn increase_speed(&mut self) {
        self.frame_interval = (self.frame_interval / 2).max(MIN_FRAME_INTERVAL);
    }

    /// Double the frame interval
    pub fn decrease_speed(&mut self) {
        self.frame_interval = (self.frame_interval * 2).min(MAX_FRAME_INTERVAL);
    }

    pub fn cycle_color_scheme(&mut self) {
        self.color_scheme = self.color_scheme.next();
        self.color_lut = self.color_scheme.build_lut();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }
}
