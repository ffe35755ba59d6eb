//! Buildspec document rendering

use std::fmt;

/// Relative path the build stage reads its instructions from.
pub const BUILDSPEC_FILE: &str = "buildspec.yml";

/// Rendered `buildspec.yml` content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSpecDocument(String);

impl BuildSpecDocument {
    /// Renders the single-phase buildspec for `stage` and `region`.
    ///
    /// `deploy_command` is written verbatim; stage and region are appended as
    /// quoted literals.
    #[must_use]
    pub fn render(deploy_command: &str, stage: &str, region: &str) -> Self {
        Self(format!(
            "version: 0.2\n\
             phases:\n  \
             build:\n    \
             commands:\n      \
             - {deploy_command} --stage \"{stage}\" --region \"{region}\""
        ))
    }

    /// Returns the document text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildSpecDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::context::DEFAULT_DEPLOY_COMMAND;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_default_command() {
        let doc = BuildSpecDocument::render(DEFAULT_DEPLOY_COMMAND, "providerStage", "us-moon-1");
        let expected = "version: 0.2
phases:
  build:
    commands:
      - npm install -g serverless && npm install && serverless deploy --stage \"providerStage\" --region \"us-moon-1\"";
        assert_eq!(doc.as_str(), expected);
    }

    #[test]
    fn test_render_is_valid_yaml() {
        let doc = BuildSpecDocument::render(DEFAULT_DEPLOY_COMMAND, "dev", "eu-west-1");
        let value: serde_yaml::Value = serde_yaml::from_str(doc.as_str()).unwrap();
        let command = value["phases"]["build"]["commands"][0].as_str().unwrap();
        assert!(command.ends_with("--stage \"dev\" --region \"eu-west-1\""));
    }

    #[test]
    fn test_render_custom_command() {
        let doc = BuildSpecDocument::render("sls deploy", "prod", "us-west-2");
        assert!(
            doc.to_string()
                .ends_with("- sls deploy --stage \"prod\" --region \"us-west-2\"")
        );
    }
}
