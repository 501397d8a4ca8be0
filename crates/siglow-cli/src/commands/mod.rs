pub mod check;
pub mod lower;

use anyhow::Context;
use codespan_reporting::files::SimpleFiles;
use siglow_lower::{
    create_files, LoweredProgram, LoweringConfig, LoweringPass, ProgramSpec, CONFIG_FILE_NAME,
};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::output::StyledOutput;
use crate::InputArgs;

/// A lowered model together with what is needed to report on it
pub struct Session {
    pub config: LoweringConfig,
    pub lowered: LoweredProgram,
    files: SimpleFiles<String, String>,
    file_id: Option<usize>,
}

impl Session {
    pub fn load(model: &Path, input: &InputArgs) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(model)
            .with_context(|| format!("failed to read model {}", model.display()))?;
        let program = ProgramSpec::from_json(&json)
            .with_context(|| format!("failed to parse model {}", model.display()))?;

        let config = load_config(model, input.config.as_deref())?;
        let lowered = LoweringPass::new(config.clone()).run(&program);

        let source = input.source.clone().or_else(|| program.source.clone());
        let (files, file_id) = match source {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read source {}", path.display()))?;
                let (files, id) = create_files(path, text);
                (files, Some(id))
            }
            None => (SimpleFiles::new(), None),
        };

        Ok(Self {
            config,
            lowered,
            files,
            file_id,
        })
    }

    /// Print every diagnostic and a summary line to stderr
    pub fn report(&self, out: &mut StyledOutput) -> anyhow::Result<()> {
        for diagnostic in &self.lowered.diagnostics {
            diagnostic.emit(out.stream(), &self.files, self.file_id)?;
        }
        let errors = self.lowered.error_count();
        out.summary(
            errors,
            self.lowered.diagnostics.len() - errors,
            self.lowered.stats.overloads,
        );
        Ok(())
    }

    pub fn diagnostics_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(&self.lowered.diagnostics)?)
    }
}

/// Explicit `--config`, else `siglow.toml` beside the model, else defaults
fn load_config(model: &Path, explicit: Option<&Path>) -> anyhow::Result<LoweringConfig> {
    let path: Option<PathBuf> = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let sibling = model
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(CONFIG_FILE_NAME);
            sibling.is_file().then_some(sibling)
        }
    };

    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            LoweringConfig::from_file(&path)
                .with_context(|| format!("invalid config {}", path.display()))
        }
        None => Ok(LoweringConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_beside_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.json");
        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        writeln!(file, "[lowering]\nthreads = 2").unwrap();

        let config = load_config(&model, None).unwrap();
        assert_eq!(config.lowering.threads, 2);
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("model.json"), None).unwrap();
        assert_eq!(config, LoweringConfig::default());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(&dir.path().join("model.json"), Some(&missing)).is_err());
    }

    #[test]
    fn test_session_lowers_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.json");
        std::fs::write(
            &model,
            r#"{
                "namespace": "app",
                "types": [{
                    "name": "T",
                    "methods": [{
                        "name": "f",
                        "params": [{
                            "name": "x",
                            "type": { "kind": "value", "name": "Int" },
                            "default": { "kind": "int", "value": 1 }
                        }]
                    }]
                }]
            }"#,
        )
        .unwrap();

        let input = InputArgs {
            config: None,
            source: None,
        };
        let session = Session::load(&model, &input).unwrap();
        assert_eq!(session.lowered.stats.overloads, 2);
        assert!(!session.lowered.has_errors());
        assert_eq!(session.diagnostics_json().unwrap(), "[]");
    }
}
