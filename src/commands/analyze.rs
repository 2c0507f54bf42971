use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dtc_lib::output::{AnalyzeOutput, ImageDescriptor, TokenCounts};
use dtc_lib::{analyze, load_image, load_tokens, load_typography, DtcError, DtcOutput};
use tracing::debug;

use crate::cli::AnalyzeArgs;
use crate::formatting::{exit_code_for_analysis, render_error, write_output};
use crate::settings::{load_config, log_effective_config, resolve_analysis_options};

/// Run the analyze command.
pub fn run_analyze(config_path: Option<PathBuf>, args: AnalyzeArgs) -> ExitCode {
    let format = args.format;
    let output = args.output.clone();

    let body = match execute(config_path.as_deref(), &args) {
        Ok(body) => body,
        Err(err) => return render_error(err, format, output),
    };
    let passed = body.passed;

    if let Err(err) = write_output(&DtcOutput::Analyze(body), format, output.clone()) {
        return render_error(DtcError::Config(err.to_string()), format, output);
    }
    exit_code_for_analysis(passed)
}

fn execute(config_path: Option<&Path>, args: &AnalyzeArgs) -> Result<AnalyzeOutput, DtcError> {
    let config = load_config(config_path)?;
    let options = resolve_analysis_options(&config, &args.sampling, &args.matching, args.parallel)?;
    log_effective_config(config_path, &options);

    debug!(path = %args.image.display(), "loading image");
    let buffer = load_image(&args.image)?;
    let tokens = load_tokens(&args.tokens)?;
    let typography = match &args.typography {
        Some(path) => load_typography(path)?,
        None => Vec::new(),
    };

    let report = analyze(&buffer, &tokens, &typography, &options)?;

    Ok(AnalyzeOutput::from_report(
        report,
        ImageDescriptor::new(args.image.display().to_string(), &buffer),
        TokenCounts::from(&tokens),
        args.include_matches,
    ))
}
