//! `siglow lower`: lower a model and print the result.

use anyhow::Context;
use siglow_lower::{render_program, RenderOptions};
use std::path::Path;
use termcolor::ColorChoice;

use super::Session;
use crate::output::StyledOutput;
use crate::{InputArgs, LowerFormat};

/// Returns `Ok(false)` when error diagnostics were produced.
pub fn execute(
    model: &Path,
    input: &InputArgs,
    format: LowerFormat,
    out: Option<&Path>,
    color: ColorChoice,
) -> anyhow::Result<bool> {
    let session = Session::load(model, input)?;

    let text = match format {
        LowerFormat::Text => {
            let options = RenderOptions::from(&session.config.lowering);
            render_program(&session.lowered, &options)
        }
        LowerFormat::Json => session.lowered.to_json()?,
    };

    match out {
        Some(path) => std::fs::write(path, &text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", text),
    }

    let mut styled = StyledOutput::new(color);
    session.report(&mut styled)?;
    Ok(!session.lowered.has_errors())
}
