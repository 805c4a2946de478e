//! Executor configuration.
use displaydoc::Display;
use schemars::gen::SchemaSettings;
use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error, Display)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// could not deserialize configuration: {0}
    DeserializeConfigError(serde_yaml::Error),
}

/// How the top level entities of one operation are resolved.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RootResolution {
    /// One after the other, in declaration order.
    #[default]
    Sequential,
    /// All at once. Results are still merged in declaration order.
    Concurrent,
}

/// The configuration of an [`Executor`](crate::Executor).
///
/// Can be created through `serde::Deserialize` from various formats,
/// or inline in Rust code with the builder.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct Configuration {
    /// How the top level entities of an operation are resolved.
    pub(crate) root_resolution: RootResolution,
}

#[buildstructor::buildstructor]
impl Configuration {
    #[builder(visibility = "pub")]
    fn new(root_resolution: Option<RootResolution>) -> Self {
        Self {
            root_resolution: root_resolution.unwrap_or_default(),
        }
    }

    /// Parse a YAML (or JSON) configuration.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigurationError> {
        serde_yaml::from_str(raw)
            .map_err(ConfigurationError::DeserializeConfigError)
    }

    /// The JSON schema of the configuration, for editors and validation tooling.
    pub fn json_schema() -> RootSchema {
        let settings = SchemaSettings::draft2019_09().with(|s| {
            s.option_nullable = true;
            s.option_add_null_type = false;
        });
        settings
            .into_generator()
            .into_root_schema_for::<Configuration>()
    }

    pub fn root_resolution(&self) -> RootResolution {
        self.root_resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let configuration = Configuration::from_yaml("{}").unwrap();
        assert_eq!(configuration, Configuration::default());
        assert_eq!(configuration.root_resolution(), RootResolution::Sequential);
    }

    #[test]
    fn yaml() {
        let configuration = Configuration::from_yaml("root_resolution: concurrent").unwrap();
        assert_eq!(
            configuration,
            Configuration::builder()
                .root_resolution(RootResolution::Concurrent)
                .build()
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = Configuration::from_yaml("parallel: true").unwrap_err();
        assert!(error
            .to_string()
            .starts_with("could not deserialize configuration: unknown field `parallel`"));
    }

    #[test]
    fn schema() {
        let schema = serde_json::to_string(&Configuration::json_schema()).unwrap();
        assert!(schema.contains("\"root_resolution\""));
        assert!(schema.contains("\"sequential\""));
        assert!(schema.contains("\"concurrent\""));
    }
}
