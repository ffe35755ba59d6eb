//! Buildspec emission

use crate::pipeline::{BuildSpecDocument, InvocationContext, ProvisionError};
use std::path::Path;
use tracing::{debug, info};

/// Renders the buildspec for the context's stage and region and writes it to
/// `path`, replacing any previous file.
///
/// # Errors
///
/// Returns a configuration error when the `awsCI` block is missing or when the
/// stage or region cannot sit inside the command's double quotes, or an IO
/// error when the file cannot be written.
pub async fn write_build_spec(
    context: &InvocationContext,
    path: &Path,
) -> Result<BuildSpecDocument, ProvisionError> {
    info!(path = %path.display(), "Creating AWS CodePipeline buildspec.yml file...");
    let ci = context.ci_settings()?;
    ensure_quotable("stage", &context.stage)?;
    ensure_quotable("region", &context.region)?;

    let document = BuildSpecDocument::render(&ci.deploy_command, &context.stage, &context.region);

    tokio::fs::write(path, document.as_str())
        .await
        .map_err(|source| ProvisionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(bytes = document.as_str().len(), "Wrote buildspec");

    Ok(document)
}

// Characters that end or expand inside a double-quoted shell word.
const UNQUOTABLE: &[char] = &['"', '\\', '$', '`', '\n'];

fn ensure_quotable(field: &str, value: &str) -> Result<(), ProvisionError> {
    if value.contains(UNQUOTABLE) {
        return Err(ProvisionError::configuration(format!(
            "{field} {value:?} cannot be quoted in the buildspec deploy command"
        )));
    }
    Ok(())
}
