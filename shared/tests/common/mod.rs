#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::future::{FutureExt, LocalBoxFuture};
use shared::camera::{
    CameraError, ConstraintKind, FacingMode, MediaDevices, MediaStream, VideoConstraints, VideoInput,
};

/// Pending once, then ready. Lets a second future run while the first is suspended.
pub struct YieldNow(bool);

pub fn yield_now() -> YieldNow {
    YieldNow(false)
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

pub struct FakeStream {
    pub device: String,
    active: Rc<Cell<bool>>,
    stops: Rc<Cell<usize>>,
}

impl MediaStream for FakeStream {
    fn stop_tracks(&self) {
        self.active.set(false);
        self.stops.set(self.stops.get() + 1);
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }
}

type Policy = Box<dyn Fn(&VideoConstraints) -> Result<(), CameraError>>;

/// Scripted camera backend that records every request.
pub struct FakeDevices {
    inputs: Vec<VideoInput>,
    policy: Policy,
    pub requests: RefCell<Vec<VideoConstraints>>,
    pub enumerations: Cell<usize>,
    pub stops: Rc<Cell<usize>>,
    streams: RefCell<Vec<Rc<Cell<bool>>>>,
}

impl FakeDevices {
    pub fn new(
        inputs: Vec<VideoInput>,
        policy: impl Fn(&VideoConstraints) -> Result<(), CameraError> + 'static,
    ) -> Self {
        Self {
            inputs,
            policy: Box::new(policy),
            requests: RefCell::new(Vec::new()),
            enumerations: Cell::new(0),
            stops: Rc::new(Cell::new(0)),
            streams: RefCell::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.get()
    }

    /// Simulates the most recent stream's tracks ending on their own.
    pub fn end_latest_stream(&self) {
        if let Some(active) = self.streams.borrow().last() {
            active.set(false);
        }
    }
}

impl MediaDevices for FakeDevices {
    type Stream = FakeStream;

    fn enumerate_video_inputs(&self) -> LocalBoxFuture<'_, Result<Vec<VideoInput>, CameraError>> {
        async move {
            self.enumerations.set(self.enumerations.get() + 1);
            Ok(self.inputs.clone())
        }
        .boxed_local()
    }

    fn get_user_media(
        &self,
        constraints: VideoConstraints,
    ) -> LocalBoxFuture<'_, Result<Self::Stream, CameraError>> {
        async move {
            self.requests.borrow_mut().push(constraints.clone());
            yield_now().await;
            (self.policy)(&constraints)?;

            let active = Rc::new(Cell::new(true));
            self.streams.borrow_mut().push(active.clone());
            Ok(FakeStream {
                device: describe(&constraints),
                active,
                stops: self.stops.clone(),
            })
        }
        .boxed_local()
    }
}

pub fn input(device_id: &str, label: &str) -> VideoInput {
    VideoInput {
        device_id: device_id.to_string(),
        label: label.to_string(),
    }
}

pub fn describe(constraints: &VideoConstraints) -> String {
    match (&constraints.device_id, constraints.facing_mode) {
        (Some(id), _) => format!("device:{}", id),
        (None, Some((mode, ConstraintKind::Exact))) => format!("exact:{}", mode),
        (None, Some((mode, ConstraintKind::Ideal))) => format!("ideal:{}", mode),
        (None, None) => "any".to_string(),
    }
}

pub fn is_exact_environment(c: &VideoConstraints) -> bool {
    c.facing_mode == Some((FacingMode::Environment, ConstraintKind::Exact))
}

pub fn is_ideal_environment(c: &VideoConstraints) -> bool {
    c.facing_mode == Some((FacingMode::Environment, ConstraintKind::Ideal))
}

pub fn is_user_facing(c: &VideoConstraints) -> bool {
    matches!(c.facing_mode, Some((FacingMode::User, _)))
}
