//! CLI logic for the Lucent diagram renderer.
//!
//! Reads a descriptor file, renders every descriptor it holds and writes one
//! output file per descriptor into the output directory.

pub mod error_adapter;

mod args;
mod config;
mod error;

pub use args::Args;
pub use error::CliError;

use std::{fs, path::Path};

use log::{error, info, warn};

use lucent::{
    DiagramRenderer, RenderFailure, RenderWarning, Rendered, descriptor::DiagramDescriptor,
};

/// Run the Lucent CLI application
///
/// Every descriptor is rendered in isolation. A descriptor that fails to
/// parse or render is written as an error placeholder SVG and does not stop
/// its siblings.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading or validation errors
/// - An input file that is not a descriptor or descriptor array
/// - One or more descriptors that failed to render, after all were processed
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_dir = args.output;
        "Processing descriptors"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let renderer = DiagramRenderer::new(app_config)?;

    let source = fs::read_to_string(&args.input)?;
    let entries = parse_descriptors(&source)?;

    let out_dir = Path::new(&args.output);
    fs::create_dir_all(out_dir)?;

    info!(count = entries.len(); "Rendering diagrams");
    let mut failed = 0;

    for (index, entry) in entries.iter().enumerate() {
        let result = match entry {
            Ok(descriptor) => renderer.render_isolated(descriptor),
            Err(failure) => Err(failure.clone()),
        };

        match result {
            Ok(output) => {
                for warning in output.warnings() {
                    match warning {
                        RenderWarning::LayoutDidNotConverge { ticks } => {
                            warn!(index = index, ticks = *ticks; "Layout did not converge, using last positions");
                        }
                    }
                }
                write_output(&renderer, out_dir, index, output.into_content())?;
            }
            Err(failure) => {
                failed += 1;
                let scene = match entry {
                    Ok(descriptor) => {
                        error!(
                            index = index,
                            kind = descriptor.kind.as_str(),
                            failure:% = failure;
                            "Diagram failed to render"
                        );
                        renderer.placeholder(descriptor, &failure)
                    }
                    Err(_) => {
                        error!(index = index, failure:% = failure; "Descriptor could not be read");
                        renderer.default_placeholder(&failure)
                    }
                };
                let svg = renderer.export_svg(&scene).map_err(CliError::Descriptor)?;
                write_file(out_dir, &format!("{index}.svg"), &svg)?;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Render {
            failed,
            total: entries.len(),
        });
    }

    info!(count = entries.len(), output_dir = args.output; "All diagrams rendered");
    Ok(())
}

/// Parses one descriptor or an array of descriptors, keeping the position of
/// JSON syntax errors for reporting.
///
/// A malformed element becomes an `Err` entry at its index rather than
/// failing the file.
fn parse_descriptors(
    source: &str,
) -> Result<Vec<Result<DiagramDescriptor, RenderFailure>>, CliError> {
    if let Err(err) = serde_json::from_str::<serde_json::Value>(source) {
        if err.is_syntax() || err.is_eof() {
            return Err(CliError::new_syntax_error(&err, source));
        }
    }
    DiagramDescriptor::from_json_batch(source).map_err(CliError::Descriptor)
}

fn write_output(
    renderer: &DiagramRenderer,
    out_dir: &Path,
    index: usize,
    content: Rendered,
) -> Result<(), CliError> {
    match content {
        Rendered::Scene(scene) => {
            let svg = renderer.export_svg(&scene).map_err(CliError::Descriptor)?;
            write_file(out_dir, &format!("{index}.svg"), &svg)
        }
        Rendered::Chart(chart) => {
            let json = serde_json::to_string_pretty(&chart).map_err(std::io::Error::from)?;
            write_file(out_dir, &format!("{index}.chart.json"), &json)
        }
        Rendered::Embedded(markup) => write_file(out_dir, &format!("{index}.html"), &markup),
    }
}

fn write_file(out_dir: &Path, name: &str, content: &str) -> Result<(), CliError> {
    let path = out_dir.join(name);
    fs::write(&path, content)?;
    info!(output_file = path.display().to_string(); "Output written");
    Ok(())
}
