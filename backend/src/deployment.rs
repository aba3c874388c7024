use std::path::{Path, PathBuf};

use shared::assets::REQUIRED_FILES;

/// Files the frontend bundle must contain.
pub const FRONTEND_FILES: &[&str] = &["index.html"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentReport {
    pub present: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
    pub model_files: Vec<String>,
}

impl DeploymentReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// The model can load only when every required model file exists.
    pub fn model_ready(&self, model_dir: &Path) -> bool {
        !self.missing.iter().any(|path| path.starts_with(model_dir))
    }

    pub fn missing_names(&self) -> Vec<String> {
        self.missing.iter().map(|p| p.display().to_string()).collect()
    }
}

pub fn check(frontend_dir: &Path, model_dir: &Path) -> DeploymentReport {
    let mut report = DeploymentReport::default();

    let required = FRONTEND_FILES
        .iter()
        .map(|file| frontend_dir.join(file))
        .chain(REQUIRED_FILES.iter().map(|file| model_dir.join(file)));
    for path in required {
        if path.is_file() {
            report.present.push(path);
        } else {
            report.missing.push(path);
        }
    }

    if let Ok(entries) = std::fs::read_dir(model_dir) {
        report.model_files = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        report.model_files.sort();
    }

    report
}

/// Logs the report the way an operator reads it: one line per file.
pub fn log_report(report: &DeploymentReport, model_dir: &Path) {
    for path in &report.present {
        log::info!("✅ {}", path.display());
    }
    for path in &report.missing {
        log::error!("❌ {} - MISSING", path.display());
    }
    if report.model_files.is_empty() {
        log::error!("Model directory {} not found or empty", model_dir.display());
    } else {
        log::info!(
            "Model directory {} contains {} files: {}",
            model_dir.display(),
            report.model_files.len(),
            report.model_files.join(", ")
        );
    }
    if report.is_complete() {
        log::info!("All required files are present");
    } else {
        log::warn!("{} required files are missing", report.missing.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"{}").unwrap();
    }

    #[test]
    fn complete_deployment() {
        let frontend = tempfile::tempdir().unwrap();
        let model = tempfile::tempdir().unwrap();
        touch(frontend.path(), "index.html");
        for file in REQUIRED_FILES {
            touch(model.path(), file);
        }

        let report = check(frontend.path(), model.path());

        assert!(report.is_complete());
        assert!(report.model_ready(model.path()));
        assert_eq!(report.model_files, vec!["metadata.json", "model.json", "weights.bin"]);
    }

    #[test]
    fn missing_weights_blocks_model() {
        let frontend = tempfile::tempdir().unwrap();
        let model = tempfile::tempdir().unwrap();
        touch(frontend.path(), "index.html");
        touch(model.path(), "model.json");
        touch(model.path(), "metadata.json");

        let report = check(frontend.path(), model.path());

        assert!(!report.model_ready(model.path()));
        assert_eq!(report.missing, vec![model.path().join("weights.bin")]);
    }

    #[test]
    fn missing_frontend_does_not_affect_model() {
        let frontend = tempfile::tempdir().unwrap();
        let model = tempfile::tempdir().unwrap();
        for file in REQUIRED_FILES {
            touch(model.path(), file);
        }

        let report = check(frontend.path(), model.path());

        assert!(!report.is_complete());
        assert!(report.model_ready(model.path()));
        assert_eq!(report.missing_names(), vec![frontend.path().join("index.html").display().to_string()]);
    }

    #[test]
    fn absent_model_dir() {
        let frontend = tempfile::tempdir().unwrap();
        let model_dir = frontend.path().join("my_model");

        let report = check(frontend.path(), &model_dir);

        assert_eq!(report.missing.len(), FRONTEND_FILES.len() + REQUIRED_FILES.len());
        assert!(report.model_files.is_empty());
    }
}
