//! Camera acquisition.
//!
//! A stream is negotiated by running an ordered list of [`AcquisitionStrategy`]s until
//! one yields a stream. Exact constraints come first since they either give the rear
//! camera or fail fast; the ideal `environment` request is the catch-all that succeeds
//! as soon as any camera exists. Intermediate failures are logged and absorbed, only the
//! terminal failure reaches the user.

use std::cell::{Cell, RefCell};

use futures::future::{FutureExt, LocalBoxFuture};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

const MOBILE_AGENTS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Device label fragments that suggest a rear-facing camera.
pub const REAR_CAMERA_KEYWORDS: &[&str] = &[
    "back",
    "rear",
    "environment",
    "main",
    "primary",
    "trasera",
    "posterior",
    "principal",
    "traseira",
    "arrière",
    "hinten",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
pub enum FacingMode {
    #[serde(rename = "user")]
    #[strum(serialize = "user")]
    User,
    #[serde(rename = "environment")]
    #[strum(serialize = "environment")]
    Environment,
}

/// Exact constraints reject when unmet, ideal ones degrade silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Exact,
    Ideal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoConstraints {
    pub facing_mode: Option<(FacingMode, ConstraintKind)>,
    /// Always applied as an exact constraint.
    pub device_id: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl VideoConstraints {
    pub fn facing(mode: FacingMode, kind: ConstraintKind) -> Self {
        Self {
            facing_mode: Some((mode, kind)),
            device_id: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    pub fn device(device_id: impl Into<String>) -> Self {
        Self {
            facing_mode: None,
            device_id: Some(device_id.into()),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInput {
    pub device_id: String,
    pub label: String,
}

/// State gathered once per initialization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraEnvironment {
    pub is_mobile: bool,
}

impl CameraEnvironment {
    pub fn from_user_agent(user_agent: &str) -> Self {
        Self {
            is_mobile: is_mobile_user_agent(user_agent),
        }
    }

    pub fn mobile() -> Self {
        Self { is_mobile: true }
    }

    pub fn desktop() -> Self {
        Self { is_mobile: false }
    }
}

pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_lowercase();
    MOBILE_AGENTS.iter().any(|agent| ua.contains(agent))
}

/// First input whose label names a rear-facing camera.
pub fn find_rear_camera(inputs: &[VideoInput]) -> Option<&VideoInput> {
    inputs.iter().find(|input| {
        let label = input.label.to_lowercase();
        REAR_CAMERA_KEYWORDS.iter().any(|k| label.contains(k))
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("Camera permission denied")]
    PermissionDenied,
    #[error("No camera found")]
    NotFound,
    #[error("Camera is in use by another application")]
    Busy,
    #[error("Camera error: {0}")]
    Other(String),
    #[error("Camera acquisition already in progress")]
    AcquisitionInProgress,
}

impl CameraError {
    /// Classifies a browser `DOMException` by its name.
    pub fn from_dom(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "PermissionDeniedError" => CameraError::PermissionDenied,
            "NotFoundError" | "DevicesNotFoundError" => CameraError::NotFound,
            "NotReadableError" | "TrackStartError" => CameraError::Busy,
            _ => CameraError::Other(message.to_string()),
        }
    }
}

pub trait MediaStream {
    /// Stops every track of the stream, releasing the camera handle.
    fn stop_tracks(&self);
    fn is_active(&self) -> bool;
}

pub trait MediaDevices {
    type Stream: MediaStream;

    fn enumerate_video_inputs(&self) -> LocalBoxFuture<'_, Result<Vec<VideoInput>, CameraError>>;

    fn get_user_media(
        &self,
        constraints: VideoConstraints,
    ) -> LocalBoxFuture<'_, Result<Self::Stream, CameraError>>;
}

/// One step of the acquisition chain. `Ok(None)` means the strategy had nothing to try.
pub trait AcquisitionStrategy<D: MediaDevices> {
    fn name(&self) -> &'static str;

    fn applies(&self, _env: &CameraEnvironment) -> bool {
        true
    }

    fn attempt<'a>(
        &'a self,
        devices: &'a D,
        env: &'a CameraEnvironment,
    ) -> LocalBoxFuture<'a, Result<Option<D::Stream>, CameraError>>;
}

/// Exact `environment` facing mode. Mobile only.
pub struct ExactEnvironment;

impl<D: MediaDevices> AcquisitionStrategy<D> for ExactEnvironment {
    fn name(&self) -> &'static str {
        "exact-environment"
    }

    fn applies(&self, env: &CameraEnvironment) -> bool {
        env.is_mobile
    }

    fn attempt<'a>(
        &'a self,
        devices: &'a D,
        _env: &'a CameraEnvironment,
    ) -> LocalBoxFuture<'a, Result<Option<D::Stream>, CameraError>> {
        devices
            .get_user_media(VideoConstraints::facing(FacingMode::Environment, ConstraintKind::Exact))
            .map(|result| result.map(Some))
            .boxed_local()
    }
}

/// Device pinned by id after matching labels against [`REAR_CAMERA_KEYWORDS`].
pub struct LabelMatch;

impl<D: MediaDevices> AcquisitionStrategy<D> for LabelMatch {
    fn name(&self) -> &'static str {
        "label-match"
    }

    fn attempt<'a>(
        &'a self,
        devices: &'a D,
        _env: &'a CameraEnvironment,
    ) -> LocalBoxFuture<'a, Result<Option<D::Stream>, CameraError>> {
        async move {
            let inputs = devices.enumerate_video_inputs().await?;
            let Some(candidate) = find_rear_camera(&inputs) else {
                log::debug!("No rear camera label among {} video inputs", inputs.len());
                return Ok(None);
            };
            log::info!("Rear camera candidate: {}", candidate.label);
            let stream = devices
                .get_user_media(VideoConstraints::device(candidate.device_id.clone()))
                .await?;
            Ok(Some(stream))
        }
        .boxed_local()
    }
}

/// Best-effort `environment` facing mode; resolves to any available camera.
pub struct IdealEnvironment;

impl<D: MediaDevices> AcquisitionStrategy<D> for IdealEnvironment {
    fn name(&self) -> &'static str {
        "ideal-environment"
    }

    fn attempt<'a>(
        &'a self,
        devices: &'a D,
        _env: &'a CameraEnvironment,
    ) -> LocalBoxFuture<'a, Result<Option<D::Stream>, CameraError>> {
        devices
            .get_user_media(VideoConstraints::facing(FacingMode::Environment, ConstraintKind::Ideal))
            .map(|result| result.map(Some))
            .boxed_local()
    }
}

/// Front camera. Desktop only, last resort.
pub struct UserFacing;

impl<D: MediaDevices> AcquisitionStrategy<D> for UserFacing {
    fn name(&self) -> &'static str {
        "user-facing"
    }

    fn applies(&self, env: &CameraEnvironment) -> bool {
        !env.is_mobile
    }

    fn attempt<'a>(
        &'a self,
        devices: &'a D,
        _env: &'a CameraEnvironment,
    ) -> LocalBoxFuture<'a, Result<Option<D::Stream>, CameraError>> {
        devices
            .get_user_media(VideoConstraints::facing(FacingMode::User, ConstraintKind::Ideal))
            .map(|result| result.map(Some))
            .boxed_local()
    }
}

pub struct Acquired<S> {
    pub stream: S,
    pub strategy: &'static str,
}

pub struct AcquisitionChain<D: MediaDevices> {
    strategies: Vec<Box<dyn AcquisitionStrategy<D>>>,
}

impl<D: MediaDevices + 'static> AcquisitionChain<D> {
    /// Exact environment, label match, ideal environment, user facing.
    pub fn standard() -> Self {
        Self::with_strategies(vec![
            Box::new(ExactEnvironment),
            Box::new(LabelMatch),
            Box::new(IdealEnvironment),
            Box::new(UserFacing),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn AcquisitionStrategy<D>>>) -> Self {
        Self { strategies }
    }

    pub fn push(&mut self, strategy: Box<dyn AcquisitionStrategy<D>>) {
        self.strategies.push(strategy);
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Runs the applicable strategies in order and returns the first stream.
    ///
    /// When every strategy fails the terminal error is `PermissionDenied` if any step
    /// was denied, else the last error seen, else `NotFound`.
    pub async fn acquire(
        &self,
        devices: &D,
        env: &CameraEnvironment,
    ) -> Result<Acquired<D::Stream>, CameraError> {
        let mut denied = false;
        let mut last_error = None;

        for strategy in self.strategies.iter().filter(|s| s.applies(env)) {
            match strategy.attempt(devices, env).await {
                Ok(Some(stream)) => {
                    log::info!("Camera acquired with strategy {}", strategy.name());
                    return Ok(Acquired {
                        stream,
                        strategy: strategy.name(),
                    });
                }
                Ok(None) => {
                    log::debug!("Strategy {} had no candidate", strategy.name());
                }
                Err(e) => {
                    log::warn!("Strategy {} failed: {}", strategy.name(), e);
                    denied |= e == CameraError::PermissionDenied;
                    last_error = Some(e);
                }
            }
        }

        let error = if denied {
            CameraError::PermissionDenied
        } else {
            last_error.unwrap_or(CameraError::NotFound)
        };
        log::error!("All camera strategies exhausted: {}", error);
        Err(error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraStart {
    /// A live stream already existed; nothing was requested.
    AlreadyActive,
    Started { strategy: &'static str },
    /// `stop` ran while the request was pending; the new stream was released.
    Cancelled,
}

struct AcquisitionGuard<'a>(&'a Cell<bool>);

impl Drop for AcquisitionGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Sole owner of the active camera stream.
///
/// Methods take `&self` so the controller can sit behind an `Rc` while a negotiation
/// is awaited; the acquiring flag rejects a second concurrent negotiation.
pub struct CameraController<D: MediaDevices> {
    devices: D,
    chain: AcquisitionChain<D>,
    current: RefCell<Option<Acquired<D::Stream>>>,
    acquiring: Cell<bool>,
    cancelled: Cell<bool>,
}

impl<D: MediaDevices + 'static> CameraController<D> {
    pub fn new(devices: D) -> Self {
        Self::with_chain(devices, AcquisitionChain::standard())
    }

    pub fn with_chain(devices: D, chain: AcquisitionChain<D>) -> Self {
        Self {
            devices,
            chain,
            current: RefCell::new(None),
            acquiring: Cell::new(false),
            cancelled: Cell::new(false),
        }
    }

    pub fn devices(&self) -> &D {
        &self.devices
    }

    pub fn is_acquiring(&self) -> bool {
        self.acquiring.get()
    }

    pub fn is_active(&self) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|acquired| acquired.stream.is_active())
    }

    pub fn strategy(&self) -> Option<&'static str> {
        self.current.borrow().as_ref().map(|acquired| acquired.strategy)
    }

    pub fn with_stream<R>(&self, f: impl FnOnce(&D::Stream) -> R) -> Option<R> {
        self.current.borrow().as_ref().map(|acquired| f(&acquired.stream))
    }

    pub async fn start(&self, env: &CameraEnvironment) -> Result<CameraStart, CameraError> {
        if self.acquiring.get() {
            return Err(CameraError::AcquisitionInProgress);
        }
        if self.is_active() {
            return Ok(CameraStart::AlreadyActive);
        }

        // A stale stream still holds its tracks until stopped.
        self.stop();

        self.acquiring.set(true);
        self.cancelled.set(false);
        let _guard = AcquisitionGuard(&self.acquiring);

        let acquired = self.chain.acquire(&self.devices, env).await?;
        if self.cancelled.replace(false) {
            acquired.stream.stop_tracks();
            log::info!("Camera request cancelled, released {} stream", acquired.strategy);
            return Ok(CameraStart::Cancelled);
        }
        let strategy = acquired.strategy;
        *self.current.borrow_mut() = Some(acquired);
        Ok(CameraStart::Started { strategy })
    }

    /// Releases the current stream and cancels a pending request, whose stream is
    /// released as soon as it arrives. Returns whether a live stream was released.
    pub fn stop(&self) -> bool {
        if self.acquiring.get() {
            self.cancelled.set(true);
        }
        match self.current.borrow_mut().take() {
            Some(acquired) => {
                acquired.stream.stop_tracks();
                log::info!("Camera stopped");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_mobile_agents() {
        assert!(is_mobile_user_agent(
            "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36"
        ));
        assert!(is_mobile_user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)"));
        assert!(!is_mobile_user_agent(
            "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
        ));
    }

    #[test]
    fn environment_follows_user_agent() {
        assert_eq!(
            CameraEnvironment::from_user_agent("Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X)"),
            CameraEnvironment::mobile()
        );
        assert_eq!(
            CameraEnvironment::from_user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"),
            CameraEnvironment::desktop()
        );
    }

    #[test]
    fn finds_rear_camera_by_label() {
        let inputs = vec![
            VideoInput {
                device_id: "a".into(),
                label: "Front Camera".into(),
            },
            VideoInput {
                device_id: "b".into(),
                label: "Cámara trasera 0".into(),
            },
        ];
        assert_eq!(find_rear_camera(&inputs).map(|i| i.device_id.as_str()), Some("b"));
        assert!(find_rear_camera(&inputs[..1]).is_none());
    }

    #[test]
    fn classifies_dom_errors() {
        assert_eq!(CameraError::from_dom("NotAllowedError", ""), CameraError::PermissionDenied);
        assert_eq!(CameraError::from_dom("NotFoundError", ""), CameraError::NotFound);
        assert_eq!(CameraError::from_dom("NotReadableError", ""), CameraError::Busy);
        assert_eq!(
            CameraError::from_dom("OverconstrainedError", "facingMode"),
            CameraError::Other("facingMode".into())
        );
    }
}
