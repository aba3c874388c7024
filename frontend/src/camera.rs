//! Browser implementation of the camera traits on top of `navigator.mediaDevices`.

use futures::future::{FutureExt, LocalBoxFuture};
use js_sys::{Array, Object, Reflect};
use shared::camera::{
    CameraError, ConstraintKind, MediaDevices, MediaStream, VideoConstraints, VideoInput,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    DomException, HtmlVideoElement, MediaDeviceInfo, MediaDeviceKind, MediaStreamConstraints,
    MediaStreamTrack,
};

pub struct WebStream {
    inner: web_sys::MediaStream,
}

impl WebStream {
    pub fn raw(&self) -> &web_sys::MediaStream {
        &self.inner
    }
}

impl MediaStream for WebStream {
    fn stop_tracks(&self) {
        for track in self.inner.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
    }

    fn is_active(&self) -> bool {
        self.inner.active()
    }
}

#[derive(Default)]
pub struct WebMediaDevices;

impl MediaDevices for WebMediaDevices {
    type Stream = WebStream;

    fn enumerate_video_inputs(&self) -> LocalBoxFuture<'_, Result<Vec<VideoInput>, CameraError>> {
        async move {
            let promise = media_devices()?.enumerate_devices().map_err(js_error)?;
            let devices: Array = JsFuture::from(promise).await.map_err(js_error)?.unchecked_into();

            Ok(devices
                .iter()
                .filter_map(|device| device.dyn_into::<MediaDeviceInfo>().ok())
                .filter(|device| device.kind() == MediaDeviceKind::Videoinput)
                .map(|device| VideoInput {
                    device_id: device.device_id(),
                    label: device.label(),
                })
                .collect())
        }
        .boxed_local()
    }

    fn get_user_media(
        &self,
        constraints: VideoConstraints,
    ) -> LocalBoxFuture<'_, Result<WebStream, CameraError>> {
        async move {
            let media = MediaStreamConstraints::new();
            media.set_audio(&JsValue::FALSE);
            media.set_video(&video_constraints(&constraints)?);

            let promise = media_devices()?
                .get_user_media_with_constraints(&media)
                .map_err(js_error)?;
            let stream = JsFuture::from(promise).await.map_err(js_error)?;
            Ok(WebStream {
                inner: stream.unchecked_into(),
            })
        }
        .boxed_local()
    }
}

/// Shows the stream in a `<video>` element and starts playback.
pub async fn attach(video: &HtmlVideoElement, stream: &web_sys::MediaStream) -> Result<(), CameraError> {
    video.set_src_object(Some(stream));
    video.set_muted(true);
    let playing = video.play().map_err(js_error)?;
    JsFuture::from(playing).await.map_err(js_error)?;
    Ok(())
}

pub fn detach(video: &HtmlVideoElement) {
    video.set_src_object(None);
}

pub fn user_agent() -> String {
    web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .unwrap_or_default()
}

fn media_devices() -> Result<web_sys::MediaDevices, CameraError> {
    let window =
        web_sys::window().ok_or_else(|| CameraError::Other("no global `window` exists".into()))?;
    window.navigator().media_devices().map_err(|_| CameraError::NotFound)
}

fn video_constraints(constraints: &VideoConstraints) -> Result<JsValue, CameraError> {
    let video = Object::new();

    if let Some((mode, kind)) = constraints.facing_mode {
        set(&video, "facingMode", &constraint(kind, JsValue::from_str(mode.as_ref()))?)?;
    }
    if let Some(device_id) = &constraints.device_id {
        set(
            &video,
            "deviceId",
            &constraint(ConstraintKind::Exact, JsValue::from_str(device_id))?,
        )?;
    }
    set(
        &video,
        "width",
        &constraint(ConstraintKind::Ideal, JsValue::from(constraints.width))?,
    )?;
    set(
        &video,
        "height",
        &constraint(ConstraintKind::Ideal, JsValue::from(constraints.height))?,
    )?;

    Ok(video.into())
}

fn constraint(kind: ConstraintKind, value: JsValue) -> Result<JsValue, CameraError> {
    let wrapper = Object::new();
    let key = match kind {
        ConstraintKind::Exact => "exact",
        ConstraintKind::Ideal => "ideal",
    };
    set(&wrapper, key, &value)?;
    Ok(wrapper.into())
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), CameraError> {
    Reflect::set(target, &JsValue::from_str(key), value).map_err(js_error)?;
    Ok(())
}

fn js_error(err: JsValue) -> CameraError {
    if let Some(dom) = err.dyn_ref::<DomException>() {
        return CameraError::from_dom(&dom.name(), &dom.message());
    }
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return CameraError::from_dom(&String::from(error.name()), &String::from(error.message()));
    }
    CameraError::Other(format!("{:?}", err))
}
