use futures::channel::oneshot;
use gloo_timers::future::TimeoutFuture;
use shared::detection::{BoundingBox, DetectedObject, crop_region};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, HtmlVideoElement};

/// Resolves on the next animation frame.
pub async fn next_frame() {
    let (tx, rx) = oneshot::channel::<()>();
    let callback = Closure::once(move |_: f64| {
        let _ = tx.send(());
    });

    let scheduled = web_sys::window()
        .map(|w| w.request_animation_frame(callback.as_ref().unchecked_ref()).is_ok())
        .unwrap_or(false);

    if scheduled {
        let _ = rx.await;
    } else {
        TimeoutFuture::new(16).await;
    }
}

fn context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

fn create_canvas(width: u32, height: u32) -> Result<HtmlCanvasElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(width);
    canvas.set_height(height);
    Ok(canvas)
}

/// Copies the current video frame onto `canvas`, resizing it to the frame.
pub fn draw_frame(
    video: &HtmlVideoElement,
    canvas: &HtmlCanvasElement,
) -> Result<CanvasRenderingContext2d, JsValue> {
    let (width, height) = (video.video_width(), video.video_height());
    if width > 0 && (canvas.width() != width || canvas.height() != height) {
        canvas.set_width(width);
        canvas.set_height(height);
    }
    let ctx = context(canvas)?;
    ctx.draw_image_with_html_video_element(video, 0.0, 0.0)?;
    Ok(ctx)
}

pub fn draw_detections(
    ctx: &CanvasRenderingContext2d,
    objects: &[DetectedObject],
    selected: Option<usize>,
) -> Result<(), JsValue> {
    for (index, object) in objects.iter().enumerate() {
        let BoundingBox { x, y, width, height } = object.bbox;
        let is_selected = selected == Some(index);

        ctx.set_stroke_style_str(if is_selected { "#ff0000" } else { "#00ff00" });
        ctx.set_line_width(if is_selected { 4.0 } else { 2.0 });
        ctx.set_fill_style_str(if is_selected {
            "rgba(255, 0, 0, 0.2)"
        } else {
            "rgba(0, 255, 0, 0.2)"
        });
        ctx.fill_rect(x, y, width, height);
        ctx.stroke_rect(x, y, width, height);

        let label = format!("{} {:.1}%", object.class, object.score * 100.0);
        ctx.set_font("14px Arial");
        let text_width = ctx.measure_text(&label)?.width();
        ctx.set_fill_style_str("#ffffff");
        ctx.fill_rect(x, y - 25.0, text_width + 10.0, 20.0);
        ctx.set_fill_style_str("#000000");
        ctx.fill_text(&label, x + 5.0, y - 10.0)?;

        ctx.set_fill_style_str("#ffffff");
        ctx.begin_path();
        ctx.arc(x + width - 15.0, y + 15.0, 12.0, 0.0, std::f64::consts::TAU)?;
        ctx.fill();
        ctx.set_fill_style_str("#000000");
        ctx.fill_text(&(index + 1).to_string(), x + width - 20.0, y + 20.0)?;
    }
    Ok(())
}

/// Copies the padded detection region into a new canvas.
pub fn crop(source: &HtmlCanvasElement, bbox: &BoundingBox) -> Result<HtmlCanvasElement, JsValue> {
    let region = crop_region(bbox, source.width() as f64, source.height() as f64);
    let cropped = create_canvas(region.width as u32, region.height as u32)?;
    context(&cropped)?
        .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
            source,
            region.x,
            region.y,
            region.width,
            region.height,
            0.0,
            0.0,
            region.width,
            region.height,
        )?;
    Ok(cropped)
}

pub fn canvas_data_url(canvas: &HtmlCanvasElement) -> Result<String, JsValue> {
    canvas.to_data_url_with_type("image/jpeg")
}

pub fn image_data_url(image: &HtmlImageElement) -> Result<String, JsValue> {
    let canvas = create_canvas(image.natural_width(), image.natural_height())?;
    context(&canvas)?.draw_image_with_html_image_element(image, 0.0, 0.0)?;
    canvas_data_url(&canvas)
}
