use super::super::{Model, StatusKind};
use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::FileList;
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: i32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));
    let timeout_clone = Rc::clone(&timeout);

    Callback::from(move |_| {
        let mut timeout_ref = timeout_clone.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        let new_timeout = Timeout::new(duration as u32, move || {
            inner_callback();
        });

        *timeout_ref = Some(new_timeout);
    })
}

pub fn extract_image_files(file_list: &FileList) -> Vec<GlooFile> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .filter(|file| file.type_().starts_with("image/"))
        .map(GlooFile::from)
        .collect()
}

pub fn render_status(model: &Model) -> Html {
    let Some((message, kind)) = &model.status else {
        return html! {};
    };
    let class = match kind {
        StatusKind::Loading => "loading",
        StatusKind::Success => "success",
        StatusKind::Error => "error",
    };

    html! {
        <div id="status" class={classes!("status", class)}>
            if *kind == StatusKind::Loading {
                <div class="loading-spinner"></div>
            }
            <p>{ message }</p>
        </div>
    }
}

pub fn render_error_message(model: &Model) -> Html {
    if let Some(error_msg) = &model.error {
        html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
            </div>
        }
    } else if let Some(notice) = &model.notice {
        html! {
            <div class="notice-message">
                <i class="fa-solid fa-circle-check"></i>
                <p>{ notice }</p>
            </div>
        }
    } else {
        html! {}
    }
}
