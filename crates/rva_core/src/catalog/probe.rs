//! Media duration probing.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

use super::error::CatalogError;

/// Resolves the duration of a media file in seconds.
pub trait DurationProbe {
    fn probe_duration(&self, path: &Path) -> Result<f64, CatalogError>;
}

/// Probes durations with `ffprobe -show_format -of json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfprobeProbe;

impl DurationProbe for FfprobeProbe {
    fn probe_duration(&self, path: &Path) -> Result<f64, CatalogError> {
        let output = Command::new("ffprobe")
            .args(["-v", "error", "-show_format", "-of", "json"])
            .arg(path)
            .output()
            .map_err(|e| CatalogError::probe_failed(path, format!("Failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            return Err(CatalogError::CommandFailed {
                tool: "ffprobe".to_string(),
                exit_code: output.status.code().unwrap_or(-1),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let json: Value = serde_json::from_slice(&output.stdout)?;
        parse_format_duration(&json)
            .ok_or_else(|| CatalogError::probe_failed(path, "no format duration in ffprobe output"))
    }
}

/// Probe that never resolves anything; declared durations must suffice.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProbe;

impl DurationProbe for NoProbe {
    fn probe_duration(&self, path: &Path) -> Result<f64, CatalogError> {
        Err(CatalogError::probe_failed(path, "probing disabled"))
    }
}

/// Extract `format.duration` (a string in ffprobe output) as seconds.
fn parse_format_duration(json: &Value) -> Option<f64> {
    let duration = json.get("format")?.get("duration")?;
    let seconds = match duration {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    (seconds.is_finite() && seconds > 0.0).then_some(seconds)
}
