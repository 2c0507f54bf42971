use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dtc_lib::output::{ImageDescriptor, PaletteOutput, DTC_OUTPUT_VERSION};
use dtc_lib::{load_image, sample_colors, DtcError, DtcOutput};
use tracing::debug;

use crate::cli::PaletteArgs;
use crate::formatting::{render_error, write_output};
use crate::settings::{load_config, resolve_sample_options};

/// Run the palette command.
pub fn run_palette(config_path: Option<PathBuf>, args: PaletteArgs) -> ExitCode {
    let format = args.format;
    let output = args.output.clone();

    let body = match execute(config_path.as_deref(), &args) {
        Ok(body) => body,
        Err(err) => return render_error(err, format, output),
    };

    if let Err(err) = write_output(&DtcOutput::Palette(body), format, output.clone()) {
        return render_error(DtcError::Config(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}

fn execute(config_path: Option<&Path>, args: &PaletteArgs) -> Result<PaletteOutput, DtcError> {
    let config = load_config(config_path)?;
    let options = resolve_sample_options(&config, &args.sampling)?;

    let buffer = load_image(&args.image)?;
    let colors = sample_colors(&buffer, &options);
    debug!(colors = colors.len(), "sampled palette");

    Ok(PaletteOutput {
        version: DTC_OUTPUT_VERSION.to_string(),
        image: ImageDescriptor::new(args.image.display().to_string(), &buffer),
        colors,
    })
}
