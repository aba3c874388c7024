use shared::camera::CameraError;
use shared::settings::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Title,
    Subtitle,
    UseWebcam,
    UploadImage,
    ClassifyImage,
    SelectOrDrag,
    Formats,
    CaptureAndClassify,
    Waiting,
    ClickObject,
    Classifying,
    Confidence,
    LowConfidence,
    Instructions,
    Tips,
    History,
    NoClassifications,
    ClearHistory,
    ExportData,
    TotalClassifications,
    AverageConfidence,
    MostCommon,
    Dataset,
    ImagesSaved,
    AverageAccuracy,
    ExportDataset,
    ClearDataset,
    Correct,
    Incorrect,
    FeedbackSaved,
    Settings,
    Language,
    Theme,
    ScanMode,
    SingleMode,
    MultiMode,
    WebcamMode,
    ContinuousMode,
    CaptureMode,
    Help,
    ModelLoading,
    ModelLoaded,
    CameraStarting,
    CameraActive,
    CameraActiveCapture,
    CameraDenied,
    CameraNotFound,
    CameraBusy,
    CameraFailed,
    CameraAlreadyStarting,
    SelectImageFirst,
    SnapshotFailed,
    NothingToExport,
    NotAnImage,
    Footer,
}

pub fn text(lang: Language, key: Text) -> &'static str {
    match lang {
        Language::Es => es(key),
        Language::En => en(key),
    }
}

/// User-facing camera failure in the chosen language; unknown errors keep their raw text.
pub fn camera_error(lang: Language, error: &CameraError) -> String {
    match error {
        CameraError::PermissionDenied => text(lang, Text::CameraDenied).to_string(),
        CameraError::NotFound => text(lang, Text::CameraNotFound).to_string(),
        CameraError::Busy => text(lang, Text::CameraBusy).to_string(),
        CameraError::AcquisitionInProgress => text(lang, Text::CameraAlreadyStarting).to_string(),
        CameraError::Other(message) => format!("{}: {}", text(lang, Text::CameraFailed), message),
    }
}

fn es(key: Text) -> &'static str {
    match key {
        Text::Title => "♻️ Clasificador de Basura IA",
        Text::Subtitle => "Apunta la cámara a un residuo o sube una foto",
        Text::UseWebcam => "Usar Webcam",
        Text::UploadImage => "Subir Imagen",
        Text::ClassifyImage => "Clasificar Imagen",
        Text::SelectOrDrag => "Selecciona o arrastra una imagen",
        Text::Formats => "Formatos: JPG, PNG, GIF",
        Text::CaptureAndClassify => "Capturar y Clasificar",
        Text::Waiting => "Esperando clasificación...",
        Text::ClickObject => "Haz clic en un objeto para clasificarlo",
        Text::Classifying => "Clasificando...",
        Text::Confidence => "Confianza",
        Text::LowConfidence => "Confianza baja: acerca el objeto o mejora la iluminación",
        Text::Instructions => "Instrucciones",
        Text::Tips => "Consejos",
        Text::History => "📊 Historial de Clasificaciones",
        Text::NoClassifications => "No hay clasificaciones aún",
        Text::ClearHistory => "Limpiar Historial",
        Text::ExportData => "Exportar Datos",
        Text::TotalClassifications => "Total Clasificaciones",
        Text::AverageConfidence => "Confianza Promedio",
        Text::MostCommon => "Categoría Más Común",
        Text::Dataset => "🧠 Dataset de Entrenamiento",
        Text::ImagesSaved => "Imágenes guardadas",
        Text::AverageAccuracy => "Precisión promedio",
        Text::ExportDataset => "Exportar Dataset",
        Text::ClearDataset => "Limpiar Dataset",
        Text::Correct => "✅ Correcto",
        Text::Incorrect => "❌ Incorrecto",
        Text::FeedbackSaved => "Imagen guardada para reentrenamiento",
        Text::Settings => "⚙️ Configuración",
        Text::Language => "Idioma",
        Text::Theme => "Tema",
        Text::ScanMode => "Modo de Escaneo",
        Text::SingleMode => "Uno por Uno",
        Text::MultiMode => "Múltiples Objetos",
        Text::WebcamMode => "Modo Webcam",
        Text::ContinuousMode => "Continuo",
        Text::CaptureMode => "Captura",
        Text::Help => "Centro de Ayuda",
        Text::ModelLoading => "Cargando modelo de IA...",
        Text::ModelLoaded => "Modelo cargado correctamente",
        Text::CameraStarting => "Iniciando cámara...",
        Text::CameraActive => "Cámara activa",
        Text::CameraActiveCapture => "Cámara activa - Presiona \"Capturar\" para analizar",
        Text::CameraDenied => "Error de cámara: permiso denegado. Permite el acceso a la cámara e inténtalo de nuevo.",
        Text::CameraNotFound => "Error de cámara: no se encontró ninguna cámara.",
        Text::CameraBusy => "Error de cámara: la cámara está siendo usada por otra aplicación.",
        Text::CameraFailed => "Error de cámara",
        Text::CameraAlreadyStarting => "La cámara ya se está iniciando.",
        Text::SelectImageFirst => "Selecciona una imagen primero.",
        Text::SnapshotFailed => "No se pudo capturar la imagen.",
        Text::NothingToExport => "Todavía no hay nada que exportar.",
        Text::NotAnImage => "Archivo omitido, no es una imagen",
        Text::Footer => "Clasificador de Basura con IA • Ayuda al medio ambiente clasificando correctamente",
    }
}

fn en(key: Text) -> &'static str {
    match key {
        Text::Title => "♻️ AI Waste Classifier",
        Text::Subtitle => "Point the camera at an item or upload a photo",
        Text::UseWebcam => "Use Webcam",
        Text::UploadImage => "Upload Image",
        Text::ClassifyImage => "Classify Image",
        Text::SelectOrDrag => "Select or drag an image",
        Text::Formats => "Formats: JPG, PNG, GIF",
        Text::CaptureAndClassify => "Capture and Classify",
        Text::Waiting => "Waiting for classification...",
        Text::ClickObject => "Click an object to classify it",
        Text::Classifying => "Classifying...",
        Text::Confidence => "Confidence",
        Text::LowConfidence => "Low confidence: move closer or improve the lighting",
        Text::Instructions => "Instructions",
        Text::Tips => "Tips",
        Text::History => "📊 Classification History",
        Text::NoClassifications => "No classifications yet",
        Text::ClearHistory => "Clear History",
        Text::ExportData => "Export Data",
        Text::TotalClassifications => "Total Classifications",
        Text::AverageConfidence => "Average Confidence",
        Text::MostCommon => "Most Common Category",
        Text::Dataset => "🧠 Training Dataset",
        Text::ImagesSaved => "Images saved",
        Text::AverageAccuracy => "Average accuracy",
        Text::ExportDataset => "Export Dataset",
        Text::ClearDataset => "Clear Dataset",
        Text::Correct => "✅ Correct",
        Text::Incorrect => "❌ Incorrect",
        Text::FeedbackSaved => "Image saved for retraining",
        Text::Settings => "⚙️ Settings",
        Text::Language => "Language",
        Text::Theme => "Theme",
        Text::ScanMode => "Scan Mode",
        Text::SingleMode => "One by One",
        Text::MultiMode => "Multiple Objects",
        Text::WebcamMode => "Webcam Mode",
        Text::ContinuousMode => "Continuous",
        Text::CaptureMode => "Capture",
        Text::Help => "Help Center",
        Text::ModelLoading => "Loading AI model...",
        Text::ModelLoaded => "Model loaded successfully",
        Text::CameraStarting => "Starting camera...",
        Text::CameraActive => "Camera active",
        Text::CameraActiveCapture => "Camera active - Press \"Capture\" to analyze",
        Text::CameraDenied => "Camera error: permission denied. Allow camera access and try again.",
        Text::CameraNotFound => "Camera error: no camera was found.",
        Text::CameraBusy => "Camera error: the camera is in use by another application.",
        Text::CameraFailed => "Camera error",
        Text::CameraAlreadyStarting => "The camera is already starting.",
        Text::SelectImageFirst => "Select an image first.",
        Text::SnapshotFailed => "Could not capture the image.",
        Text::NothingToExport => "There is nothing to export yet.",
        Text::NotAnImage => "Skipped non-image file",
        Text::Footer => "AI Waste Classifier • Help the environment by sorting correctly",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_errors_follow_language() {
        assert_eq!(
            camera_error(Language::Es, &CameraError::NotFound),
            "Error de cámara: no se encontró ninguna cámara."
        );
        assert_eq!(
            camera_error(Language::En, &CameraError::Other("OverconstrainedError".into())),
            "Camera error: OverconstrainedError"
        );
    }
}
