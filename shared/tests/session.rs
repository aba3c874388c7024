mod common;

use std::cell::Cell;

use common::*;
use futures::executor::block_on;
use futures::join;
use shared::camera::{CameraController, CameraEnvironment, CameraStart};
use shared::classification::{ClassificationResult, Prediction, guidance_for};
use shared::session::{InputMode, LiveLoop, ModeChange, ModelState, Session};
use shared::waste_info::{WasteCategory, WasteTable};

fn session() -> Session<FakeDevices> {
    Session::new(CameraController::new(FakeDevices::new(vec![], |_| Ok(()))))
}

#[test]
fn leaving_webcam_mode_stops_loop_and_releases_camera() {
    let session = session();
    session.mark_model_ready();
    block_on(session.start_camera(&CameraEnvironment::desktop())).unwrap();
    let token = session.begin_live().expect("live loop should start");
    assert!(session.live_loop().is_current(token));

    let change = session.switch_mode(InputMode::Upload);

    assert_eq!(change, ModeChange::LeftWebcam { camera_released: true });
    assert!(!session.live_loop().is_running());
    assert!(!session.camera().is_active());
    assert_eq!(session.camera().devices().stop_count(), 1);
}

#[test]
fn shutdown_while_request_pending_releases_new_stream() {
    let session = session();
    let env = CameraEnvironment::desktop();

    let (start, ()) = block_on(async {
        join!(session.start_camera(&env), async {
            assert!(session.camera().is_acquiring());
            session.shutdown();
        })
    });

    assert_eq!(start, Ok(CameraStart::Cancelled));
    assert!(!session.camera().is_active());
    assert_eq!(session.camera().devices().stop_count(), 1);
}

#[test]
fn leaving_webcam_while_request_pending_releases_camera() {
    let session = session();
    let env = CameraEnvironment::desktop();

    let (start, change) = block_on(async {
        join!(session.start_camera(&env), async {
            session.switch_mode(InputMode::Upload)
        })
    });

    assert_eq!(change, ModeChange::LeftWebcam { camera_released: false });
    assert_eq!(start, Ok(CameraStart::Cancelled));
    assert_eq!(session.mode(), InputMode::Upload);
    assert!(!session.camera().is_active());
    assert_eq!(session.camera().devices().stop_count(), 1);
}

#[test]
fn camera_starts_again_after_cancelled_request() {
    let session = session();
    let env = CameraEnvironment::desktop();
    block_on(async { join!(session.start_camera(&env), async { session.shutdown() }) });

    let start = block_on(session.start_camera(&env)).unwrap();

    assert!(matches!(start, CameraStart::Started { .. }));
    assert!(session.camera().is_active());
}

#[test]
fn returning_to_webcam_requests_acquisition() {
    let session = session();
    assert_eq!(session.switch_mode(InputMode::Webcam), ModeChange::Unchanged);
    assert_eq!(
        session.switch_mode(InputMode::Upload),
        ModeChange::LeftWebcam { camera_released: false }
    );
    assert_eq!(session.switch_mode(InputMode::Webcam), ModeChange::EnteredWebcam);
    assert_eq!(session.mode(), InputMode::Webcam);
}

#[test]
fn live_loop_needs_ready_model_and_active_camera() {
    let session = session();
    assert!(session.begin_live().is_none());

    session.mark_model_ready();
    assert!(session.begin_live().is_none());

    let start = block_on(session.start_camera(&CameraEnvironment::desktop())).unwrap();
    assert!(matches!(start, CameraStart::Started { .. }));
    assert!(session.begin_live().is_some());
}

#[test]
fn failed_model_disables_inference() {
    let session = session();
    session.mark_model_failed("model.json not found");
    assert!(!session.can_infer());
    assert_eq!(
        session.model_state(),
        ModelState::Failed("model.json not found".into())
    );
}

#[test]
fn switching_modes_clears_last_guidance() {
    let session = session();
    let result = ClassificationResult::from(vec![Prediction::new("Lata", 0.99)]);
    session.set_guidance(guidance_for(WasteTable::builtin(), &result));
    assert_eq!(
        session.last_guidance().map(|g| g.info.category),
        Some(WasteCategory::Reciclable)
    );

    session.switch_mode(InputMode::Upload);
    assert!(session.last_guidance().is_none());
}

#[test]
fn loop_runs_until_stopped() {
    let live = LiveLoop::new();
    let token = live.start();
    let cycles = Cell::new(0);
    let frames = Cell::new(0);

    let result: Result<usize, String> = block_on(live.run(
        token,
        || {
            cycles.set(cycles.get() + 1);
            if cycles.get() == 3 {
                live.stop();
            }
            async { Ok(()) }
        },
        || {
            frames.set(frames.get() + 1);
            async {}
        },
    ));

    assert_eq!(result, Ok(3));
    assert_eq!(frames.get(), 3);
    assert!(!live.is_running());
}

#[test]
fn failing_cycle_stops_the_loop() {
    let live = LiveLoop::new();
    let token = live.start();

    let result: Result<usize, String> = block_on(live.run(
        token,
        || async { Err("prediction failed".to_string()) },
        || async {},
    ));

    assert_eq!(result, Err("prediction failed".to_string()));
    assert!(!live.is_running());
}

#[test]
fn superseded_run_exits() {
    let live = LiveLoop::new();
    let stale = live.start();
    let current = live.start();
    assert_ne!(stale, current);

    let result: Result<usize, String> = block_on(live.run(stale, || async { Ok(()) }, || async {}));

    assert_eq!(result, Ok(0));
    assert!(live.is_current(current));
}
