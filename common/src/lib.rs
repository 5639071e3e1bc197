use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

pub mod file_utils;
pub mod float_ext;
pub mod log_setup;

pub const EPSILON: f64 = 1e-6;

#[derive(Debug, thiserror::Error)]
pub enum FileExtensionError {
    #[error("Failed to get file extension")]
    MissingFileExtension,
    #[error("Unsupported file extension for file: {0}")]
    UnsupportedFileExtension(String),
}

pub type FileFormatResult<T> = Result<T, FileExtensionError>;

#[derive(Debug, thiserror::Error)]
pub enum SerdeFormatError {
    #[error("YAML serialization failed")]
    Yaml(#[from] serde_yml::Error),
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
}

pub type SerdeFormatResult<T> = Result<T, SerdeFormatError>;

pub fn get_file_extension(filename: &str) -> Option<&str> {
    Path::new(filename)
        .extension()
        .and_then(|os_str| os_str.to_str())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    pub fn from_file_name(file_name: &str) -> FileFormatResult<Self> {
        let extension = get_file_extension(file_name)
            .map(|ext| ext.to_ascii_lowercase())
            .ok_or(FileExtensionError::MissingFileExtension)?;

        match extension.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(FileExtensionError::UnsupportedFileExtension(
                file_name.to_string(),
            )),
        }
    }
}

pub fn serialize<T: Serialize>(value: &T, format: FileFormat) -> SerdeFormatResult<String> {
    match format {
        FileFormat::Yaml => Ok(serde_yml::to_string(value)?),
        FileFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

pub fn deserialize<T: DeserializeOwned>(
    serialized: &str,
    format: FileFormat,
) -> SerdeFormatResult<T> {
    match format {
        FileFormat::Yaml => Ok(serde_yml::from_str(serialized)?),
        FileFormat::Json => Ok(serde_json::from_str(serialized)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Sample {
        name: String,
        tolerance: f64,
    }

    #[test]
    fn file_format_from_extension() {
        assert_eq!(FileFormat::from_file_name("a.yaml").unwrap(), FileFormat::Yaml);
        assert_eq!(FileFormat::from_file_name("a.YML").unwrap(), FileFormat::Yaml);
        assert_eq!(FileFormat::from_file_name("a.json").unwrap(), FileFormat::Json);
        assert!(matches!(
            FileFormat::from_file_name("a.lua"),
            Err(FileExtensionError::UnsupportedFileExtension(_))
        ));
        assert!(matches!(
            FileFormat::from_file_name("noext"),
            Err(FileExtensionError::MissingFileExtension)
        ));
    }

    #[test]
    fn yaml_and_json_deserialize() {
        let yaml: Sample = deserialize("name: fit\ntolerance: 0.5\n", FileFormat::Yaml).unwrap();
        assert_eq!(
            yaml,
            Sample {
                name: "fit".into(),
                tolerance: 0.5
            }
        );

        let json: Sample =
            deserialize(r#"{"name":"fit","tolerance":0.25}"#, FileFormat::Json).unwrap();
        assert_eq!(json.tolerance, 0.25);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result: SerdeFormatResult<Sample> = deserialize("name: [", FileFormat::Yaml);
        assert!(matches!(result, Err(SerdeFormatError::Yaml(_))));
    }
}
