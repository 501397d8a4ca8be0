//! `siglow check`: lower a model and report diagnostics only.

use std::path::Path;
use termcolor::ColorChoice;

use super::Session;
use crate::output::StyledOutput;
use crate::{CheckFormat, InputArgs};

pub fn execute(
    model: &Path,
    input: &InputArgs,
    format: CheckFormat,
    color: ColorChoice,
) -> anyhow::Result<bool> {
    let session = Session::load(model, input)?;

    match format {
        CheckFormat::Pretty => {
            let mut styled = StyledOutput::new(color);
            session.report(&mut styled)?;
        }
        CheckFormat::Json => println!("{}", session.diagnostics_json()?),
    }

    Ok(!session.lowered.has_errors())
}
