//! vdemo-add-licenses - stamp the GPL banner onto source files missing one.
//!
//! Fixed, parameterless one-shot maintenance tool, independent of the build
//! pipeline. Walks the current directory, skipping 3rdParty and hidden
//! directories, and rewrites every .cpp/.h/.hlsl file whose first character
//! is not `/`.

use anyhow::Result;
use camino::Utf8Path;
use vdemo_tools::{APP_NAME, VERSION, headers};

fn main() -> Result<()> {
    let _guard = vdemo_tools::logging::init("vdemo-add-licenses", false)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let report = headers::insert_headers(Utf8Path::new("."))?;

    tracing::info!(
        "Done: {} files stamped, {} unchanged",
        report.stamped,
        report.unchanged
    );

    Ok(())
}
