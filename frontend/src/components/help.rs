use super::super::{Model, Msg};
use crate::i18n::Text;
use shared::classification::CONFIDENCE_THRESHOLD;
use shared::settings::Language;
use wasm_bindgen::JsValue;
use yew::html::Scope;
use yew::prelude::*;

struct HelpSection {
    title: &'static str,
    lines: &'static [&'static str],
}

const HELP_ES: &[HelpSection] = &[
    HelpSection {
        title: "🎥 Modo Webcam",
        lines: &[
            "Permite el acceso a la cámara cuando el navegador lo solicite.",
            "En móviles se usa la cámara trasera.",
            "En modo Captura presiona \"Capturar y Clasificar\" para analizar un fotograma.",
        ],
    },
    HelpSection {
        title: "📁 Subir Imagen",
        lines: &[
            "Selecciona, arrastra o pega una imagen.",
            "Presiona \"Clasificar Imagen\" para obtener el resultado.",
        ],
    },
    HelpSection {
        title: "🔍 Detección Múltiple",
        lines: &[
            "Activa \"Múltiples Objetos\" en Configuración.",
            "Haz clic en un recuadro para clasificar ese objeto.",
        ],
    },
    HelpSection {
        title: "🛠️ Solución de Problemas",
        lines: &[
            "Si la cámara está en uso, cierra otras aplicaciones que la utilicen.",
            "Si el modelo no carga, verifica que la carpeta my_model/ esté desplegada.",
        ],
    },
];

const HELP_EN: &[HelpSection] = &[
    HelpSection {
        title: "🎥 Webcam Mode",
        lines: &[
            "Allow camera access when the browser asks.",
            "Phones use the rear camera.",
            "In Capture mode press \"Capture and Classify\" to analyze one frame.",
        ],
    },
    HelpSection {
        title: "📁 Upload Image",
        lines: &[
            "Select, drag or paste an image.",
            "Press \"Classify Image\" to get the result.",
        ],
    },
    HelpSection {
        title: "🔍 Multiple Object Detection",
        lines: &[
            "Enable \"Multiple Objects\" in Settings.",
            "Click a box to classify that object.",
        ],
    },
    HelpSection {
        title: "🛠️ Troubleshooting",
        lines: &[
            "If the camera is busy, close other applications using it.",
            "If the model does not load, check the my_model/ folder is deployed.",
        ],
    },
];

pub fn render_help(model: &Model, link: &Scope<Model>) -> Html {
    if !model.show_help {
        return html! {};
    }

    let sections = match model.settings.language {
        Language::Es => HELP_ES,
        Language::En => HELP_EN,
    };
    let threshold = match model.settings.language {
        Language::Es => format!("Los resultados por debajo del {:.0}% de confianza se marcan como poco fiables.", CONFIDENCE_THRESHOLD * 100.0),
        Language::En => format!("Results below {:.0}% confidence are flagged as unreliable.", CONFIDENCE_THRESHOLD * 100.0),
    };

    // Clicks on the backdrop close the modal, clicks inside it do not.
    let on_backdrop = link.batch_callback(|e: MouseEvent| {
        let on_backdrop = e
            .target()
            .zip(e.current_target())
            .is_some_and(|(target, current)| JsValue::from(target) == JsValue::from(current));
        on_backdrop.then_some(Msg::ToggleHelp(false))
    });

    html! {
        <div id="help-modal" class="modal show" onclick={on_backdrop}>
            <div class="modal-content">
                <button class="close-btn" onclick={link.callback(|_| Msg::ToggleHelp(false))}>{ "×" }</button>
                <h2>{ model.t(Text::Help) }</h2>
                { for sections.iter().map(|section| html! {
                    <div class="help-section">
                        <h3>{ section.title }</h3>
                        <ul>{ for section.lines.iter().map(|line| html! { <li>{ *line }</li> }) }</ul>
                    </div>
                })}
                <p class="help-note">{ threshold }</p>
            </div>
        </div>
    }
}
