mod common;

use common::*;
use futures::executor::block_on;
use futures::future::{FutureExt, LocalBoxFuture};
use shared::camera::{
    AcquisitionChain, AcquisitionStrategy, CameraController, CameraEnvironment, CameraError, CameraStart,
    LabelMatch, MediaDevices, VideoConstraints,
};

fn requested(devices: &FakeDevices) -> Vec<String> {
    devices.requests.borrow().iter().map(describe).collect()
}

#[test]
fn mobile_tries_label_match_after_exact_environment_fails() {
    let devices = FakeDevices::new(
        vec![input("front-id", "Front Camera"), input("back-id", "Back Camera")],
        |c| {
            if is_exact_environment(c) {
                Err(CameraError::Other("OverconstrainedError".into()))
            } else {
                Ok(())
            }
        },
    );
    let chain = AcquisitionChain::standard();

    let acquired = block_on(chain.acquire(&devices, &CameraEnvironment::mobile())).unwrap();

    assert_eq!(acquired.strategy, "label-match");
    assert_eq!(acquired.stream.device, "device:back-id");
    assert_eq!(requested(&devices), vec!["exact:environment", "device:back-id"]);
}

#[test]
fn label_match_precedes_ideal_which_precedes_user_facing_on_desktop() {
    let devices = FakeDevices::new(vec![input("cam", "Rear sensor")], |c| {
        if is_user_facing(c) {
            Ok(())
        } else {
            Err(CameraError::Busy)
        }
    });
    let chain = AcquisitionChain::standard();

    let acquired = block_on(chain.acquire(&devices, &CameraEnvironment::desktop())).unwrap();

    assert_eq!(acquired.strategy, "user-facing");
    assert_eq!(
        requested(&devices),
        vec!["device:cam", "ideal:environment", "ideal:user"]
    );
}

#[test]
fn mobile_never_falls_back_to_user_facing() {
    let devices = FakeDevices::new(vec![input("cam", "Camera 0")], |_| Err(CameraError::Busy));
    let chain = AcquisitionChain::standard();

    let result = block_on(chain.acquire(&devices, &CameraEnvironment::mobile()));

    assert_eq!(result.err(), Some(CameraError::Busy));
    assert_eq!(requested(&devices), vec!["exact:environment", "ideal:environment"]);
    assert_eq!(devices.enumerations.get(), 1);
}

#[test]
fn ideal_environment_succeeds_when_no_label_matches() {
    let devices = FakeDevices::new(vec![input("cam", "Integrated Webcam")], |c| {
        if is_ideal_environment(c) {
            Ok(())
        } else {
            Err(CameraError::NotFound)
        }
    });

    let acquired = block_on(AcquisitionChain::standard().acquire(&devices, &CameraEnvironment::desktop()))
        .unwrap();

    assert_eq!(acquired.strategy, "ideal-environment");
    assert_eq!(requested(&devices), vec!["ideal:environment"]);
}

#[test]
fn permission_denial_dominates_terminal_error() {
    let devices = FakeDevices::new(vec![], |c| {
        if is_ideal_environment(c) {
            Err(CameraError::PermissionDenied)
        } else {
            Err(CameraError::Other("boom".into()))
        }
    });

    let result = block_on(AcquisitionChain::standard().acquire(&devices, &CameraEnvironment::desktop()));

    assert_eq!(result.err(), Some(CameraError::PermissionDenied));
}

#[test]
fn chain_without_candidates_reports_not_found() {
    let devices = FakeDevices::new(vec![], |_| Ok(()));
    let chain: AcquisitionChain<FakeDevices> = AcquisitionChain::with_strategies(vec![Box::new(LabelMatch)]);

    let result = block_on(chain.acquire(&devices, &CameraEnvironment::desktop()));

    assert_eq!(result.err(), Some(CameraError::NotFound));
    assert_eq!(devices.request_count(), 0);
}

struct PinnedDevice(&'static str);

impl AcquisitionStrategy<FakeDevices> for PinnedDevice {
    fn name(&self) -> &'static str {
        "pinned"
    }

    fn attempt<'a>(
        &'a self,
        devices: &'a FakeDevices,
        _env: &'a CameraEnvironment,
    ) -> LocalBoxFuture<'a, Result<Option<FakeStream>, CameraError>> {
        devices
            .get_user_media(VideoConstraints::device(self.0))
            .map(|r| r.map(Some))
            .boxed_local()
    }
}

#[test]
fn custom_strategies_run_in_given_order() {
    let devices = FakeDevices::new(vec![], |_| Ok(()));
    let mut chain: AcquisitionChain<FakeDevices> =
        AcquisitionChain::with_strategies(vec![Box::new(PinnedDevice("usb-1"))]);
    chain.push(Box::new(LabelMatch));

    assert_eq!(chain.strategy_names(), vec!["pinned", "label-match"]);
    let acquired = block_on(chain.acquire(&devices, &CameraEnvironment::mobile())).unwrap();
    assert_eq!(acquired.strategy, "pinned");
    assert_eq!(requested(&devices), vec!["device:usb-1"]);
}

#[test]
fn starting_an_active_camera_is_a_no_op() {
    let controller = CameraController::new(FakeDevices::new(vec![], |_| Ok(())));
    let env = CameraEnvironment::desktop();

    let first = block_on(controller.start(&env)).unwrap();
    assert_eq!(first, CameraStart::Started { strategy: "ideal-environment" });
    assert_eq!(controller.devices().request_count(), 1);

    let second = block_on(controller.start(&env)).unwrap();
    assert_eq!(second, CameraStart::AlreadyActive);
    assert_eq!(controller.devices().request_count(), 1);
    assert_eq!(controller.devices().stop_count(), 0);
}

#[test]
fn restarting_after_stream_ended_releases_previous_tracks() {
    let controller = CameraController::new(FakeDevices::new(vec![], |_| Ok(())));
    let env = CameraEnvironment::desktop();

    block_on(controller.start(&env)).unwrap();
    controller.devices().end_latest_stream();
    assert!(!controller.is_active());

    let restarted = block_on(controller.start(&env)).unwrap();

    assert_eq!(restarted, CameraStart::Started { strategy: "ideal-environment" });
    assert_eq!(controller.devices().stop_count(), 1);
    assert_eq!(controller.devices().request_count(), 2);
    assert!(controller.is_active());
}

#[test]
fn concurrent_start_is_rejected() {
    let controller = CameraController::new(FakeDevices::new(vec![], |_| Ok(())));
    let env = CameraEnvironment::desktop();

    let (first, second) = block_on(async { futures::join!(controller.start(&env), controller.start(&env)) });

    assert!(first.is_ok());
    assert_eq!(second, Err(CameraError::AcquisitionInProgress));
    assert_eq!(controller.devices().request_count(), 1);
    assert!(!controller.is_acquiring());
}

#[test]
fn failed_start_clears_the_acquiring_flag() {
    let controller = CameraController::new(FakeDevices::new(vec![], |_| Err(CameraError::NotFound)));

    let result = block_on(controller.start(&CameraEnvironment::desktop()));

    assert_eq!(result, Err(CameraError::NotFound));
    assert!(!controller.is_acquiring());
    assert!(controller.strategy().is_none());
}

#[test]
fn stop_releases_all_tracks() {
    let controller = CameraController::new(FakeDevices::new(vec![], |_| Ok(())));
    block_on(controller.start(&CameraEnvironment::desktop())).unwrap();

    assert!(controller.stop());
    assert!(!controller.stop());
    assert_eq!(controller.devices().stop_count(), 1);
    assert!(!controller.is_active());
}
