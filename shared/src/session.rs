//! Session state shared by the UI handlers.
//!
//! Everything lives behind `Cell`/`RefCell` so a single `Rc<Session>` can be handed to
//! event handlers and spawned futures on the (single-threaded) browser event loop.

use std::cell::{Cell, RefCell};
use std::future::Future;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::camera::{CameraController, CameraEnvironment, CameraError, CameraStart, MediaDevices};
use crate::classification::Guidance;
use crate::settings::ScanMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum InputMode {
    #[default]
    Webcam,
    Upload,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelState {
    #[default]
    Loading,
    Ready,
    /// Terminal until the page is reloaded.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    Unchanged,
    /// The caller should run camera acquisition.
    EnteredWebcam,
    LeftWebcam { camera_released: bool },
}

/// Identifies one run of the live loop. Stale runs exit on their next iteration.
pub type LoopToken = u64;

/// Stop flag for the continuous prediction loop.
#[derive(Debug, Default)]
pub struct LiveLoop {
    running: Cell<bool>,
    generation: Cell<u64>,
}

impl LiveLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new run, invalidating any previous one.
    pub fn start(&self) -> LoopToken {
        let token = self.generation.get() + 1;
        self.generation.set(token);
        self.running.set(true);
        token
    }

    pub fn stop(&self) {
        self.running.set(false);
        self.generation.set(self.generation.get() + 1);
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn is_current(&self, token: LoopToken) -> bool {
        self.running.get() && self.generation.get() == token
    }

    /// Runs `cycle` then awaits `next_frame` until the run is stopped or superseded.
    /// A failing cycle stops the loop and returns its error. Returns the number of
    /// completed cycles otherwise.
    pub async fn run<E, C, CF, N, NF>(
        &self,
        token: LoopToken,
        mut cycle: C,
        mut next_frame: N,
    ) -> Result<usize, E>
    where
        C: FnMut() -> CF,
        CF: Future<Output = Result<(), E>>,
        N: FnMut() -> NF,
        NF: Future<Output = ()>,
    {
        let mut cycles = 0;
        while self.is_current(token) {
            if let Err(e) = cycle().await {
                if self.is_current(token) {
                    self.stop();
                }
                return Err(e);
            }
            cycles += 1;
            next_frame().await;
        }
        Ok(cycles)
    }
}

pub struct Session<D: MediaDevices> {
    camera: CameraController<D>,
    live: LiveLoop,
    mode: Cell<InputMode>,
    scan_mode: Cell<ScanMode>,
    model: RefCell<ModelState>,
    last_guidance: RefCell<Option<Guidance>>,
}

impl<D: MediaDevices + 'static> Session<D> {
    pub fn new(camera: CameraController<D>) -> Self {
        Self {
            camera,
            live: LiveLoop::new(),
            mode: Cell::new(InputMode::default()),
            scan_mode: Cell::new(ScanMode::default()),
            model: RefCell::new(ModelState::default()),
            last_guidance: RefCell::new(None),
        }
    }

    pub fn camera(&self) -> &CameraController<D> {
        &self.camera
    }

    pub fn live_loop(&self) -> &LiveLoop {
        &self.live
    }

    pub fn mode(&self) -> InputMode {
        self.mode.get()
    }

    pub fn scan_mode(&self) -> ScanMode {
        self.scan_mode.get()
    }

    pub fn set_scan_mode(&self, scan_mode: ScanMode) {
        self.scan_mode.set(scan_mode);
    }

    pub fn model_state(&self) -> ModelState {
        self.model.borrow().clone()
    }

    pub fn mark_model_ready(&self) {
        *self.model.borrow_mut() = ModelState::Ready;
    }

    pub fn mark_model_failed(&self, reason: impl Into<String>) {
        *self.model.borrow_mut() = ModelState::Failed(reason.into());
    }

    pub fn can_infer(&self) -> bool {
        *self.model.borrow() == ModelState::Ready
    }

    pub fn last_guidance(&self) -> Option<Guidance> {
        self.last_guidance.borrow().clone()
    }

    pub fn set_guidance(&self, guidance: Option<Guidance>) {
        *self.last_guidance.borrow_mut() = guidance;
    }

    /// Switches input mode. Leaving webcam mode stops the live loop and releases the
    /// camera; in-flight inference completes and is discarded by the caller.
    pub fn switch_mode(&self, mode: InputMode) -> ModeChange {
        let previous = self.mode.replace(mode);
        if previous == mode {
            return ModeChange::Unchanged;
        }

        self.set_guidance(None);
        match mode {
            InputMode::Webcam => ModeChange::EnteredWebcam,
            InputMode::Upload => {
                self.live.stop();
                let camera_released = self.camera.stop();
                ModeChange::LeftWebcam { camera_released }
            }
        }
    }

    /// Runs camera acquisition for webcam mode.
    pub async fn start_camera(&self, env: &CameraEnvironment) -> Result<CameraStart, CameraError> {
        self.camera.start(env).await
    }

    /// Starts a live-loop run if the session is in webcam mode with a ready model and
    /// an active camera.
    pub fn begin_live(&self) -> Option<LoopToken> {
        if self.mode() == InputMode::Webcam && self.can_infer() && self.camera.is_active() {
            Some(self.live.start())
        } else {
            None
        }
    }

    /// Stops the loop and releases the camera, e.g. when navigating away.
    pub fn shutdown(&self) {
        self.live.stop();
        self.camera.stop();
    }
}
