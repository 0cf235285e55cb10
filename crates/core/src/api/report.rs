//! Per-run generation record.

use std::path::Path;

use serde::Serialize;

use super::generator::Generator;
use crate::utils::sha256_hex;

/// Outcome of one generator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenStatus {
    Success,
    Error,
}

/// What was generated from what, with content hashes so a result can be
/// reproduced and checked later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub status: GenStatus,
    pub generator: String,
    pub host_format: String,
    pub payload_format: String,
    pub host_path: String,
    pub host_sha256: String,
    pub payload_path: String,
    pub payload_sha256: String,
    pub output_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationReport {
    /// Run `generator` and record the outcome.
    ///
    /// Failure is captured in the report rather than returned, so a caller
    /// working through many documents can log it and move on. The output
    /// bytes are returned alongside on success; nothing is written here.
    pub fn run<G: Generator + ?Sized>(
        generator: &G,
        host_path: &Path,
        host: &[u8],
        payload_path: &Path,
        payload: &[u8],
        output_path: &Path,
    ) -> (Self, Option<Vec<u8>>) {
        let outcome = generator.generate(host, payload);
        let (status, output_sha256, error, output) = match outcome {
            Ok(output) => (GenStatus::Success, Some(sha256_hex(&output)), None, Some(output)),
            Err(err) => (GenStatus::Error, None, Some(err.to_string()), None),
        };

        let report = Self {
            status,
            generator: generator.name().to_string(),
            host_format: generator.host_format().to_string(),
            payload_format: payload_format(payload_path),
            host_path: host_path.display().to_string(),
            host_sha256: sha256_hex(host),
            payload_path: payload_path.display().to_string(),
            payload_sha256: sha256_hex(payload),
            output_path: output_path.display().to_string(),
            output_sha256,
            error,
        };
        (report, output)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Upper-cased file extension, e.g. `payload.php` -> `PHP`.
fn payload_format(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map_or_else(|| "UNKNOWN".to_string(), str::to_ascii_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PolyError, Result};

    struct Fixed(Option<&'static [u8]>);

    impl Generator for Fixed {
        fn name(&self) -> &str {
            "Fixed"
        }
        fn host_format(&self) -> &str {
            "PDF"
        }
        fn generate(&self, _host: &[u8], _payload: &[u8]) -> Result<Vec<u8>> {
            self.0.map(<[u8]>::to_vec).ok_or(PolyError::PageNotFound)
        }
    }

    #[test]
    fn success_records_output_hash() {
        let (report, output) = GenerationReport::run(
            &Fixed(Some(&b""[..])),
            Path::new("host.pdf"),
            b"host",
            Path::new("shell.php"),
            b"payload",
            Path::new("out.pdf"),
        );
        assert_eq!(report.status, GenStatus::Success);
        assert_eq!(report.payload_format, "PHP");
        assert_eq!(
            report.output_sha256.as_deref(),
            Some("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
        );
        assert!(report.error.is_none());
        assert_eq!(output.as_deref(), Some(&b""[..]));
    }

    #[test]
    fn failure_is_recorded_not_returned() {
        let (report, output) = GenerationReport::run(
            &Fixed(None),
            Path::new("host.pdf"),
            b"host",
            Path::new("payload"),
            b"payload",
            Path::new("out.pdf"),
        );
        assert_eq!(report.status, GenStatus::Error);
        assert_eq!(report.payload_format, "UNKNOWN");
        assert_eq!(report.error.as_deref(), Some("no page object found in document"));
        assert!(output.is_none());

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["status"], "error");
        assert!(json.get("output_sha256").is_none());
    }
}
