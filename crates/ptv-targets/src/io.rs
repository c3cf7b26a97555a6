//! JSON configuration/report helpers and the legacy PTV target file format.
//!
//! Legacy target files hold one frame of one camera: a first line with the
//! target count, then one whitespace-separated line per target
//!
//! ```text
//! id x y pixel_count width height sum_intensity correspondence
//! ```
//!
//! where `correspondence` is `-1` until a matching stage fills it in.

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use nalgebra::Point2;
use ptv_targets_core::Target;
use ptv_targets_segment::{DetectionConfig, DetectionStats};
use serde::{Deserialize, Serialize};

/// Correspondence index written for targets not yet matched across cameras.
pub const NO_CORRESPONDENCE: i64 = -1;

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("target file line {line}: {message}")]
    Parse { line: usize, message: String },
}

fn parse_error(line: usize, message: impl Into<String>) -> IoError {
    IoError::Parse {
        line,
        message: message.into(),
    }
}

/// Configuration for one CLI detection run, loaded from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectConfig {
    /// Input image; the CLI argument wins when both are given.
    #[serde(default)]
    pub image_path: Option<String>,
    /// Where to write the JSON report.
    #[serde(default)]
    pub report_path: Option<String>,
    /// Where to write a legacy target file, if anywhere.
    #[serde(default)]
    pub targets_path: Option<String>,
    #[serde(default)]
    pub detection: DetectionConfig,
}

impl DetectConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ptv_targets_report.json"))
    }
}

/// Summary of one detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    pub image_path: String,
    pub width: usize,
    pub height: usize,
    pub config: DetectionConfig,
    pub stats: DetectionStats,
    pub targets: Vec<Target>,
}

impl DetectionReport {
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Conventional per-frame file name, e.g. `cam1.` + 10001 -> `cam1.10001_targets`.
pub fn target_file_name(base: &str, frame: u32) -> String {
    format!("{base}{frame:04}_targets")
}

/// Write targets in the legacy text format.
pub fn write_targets_to<W: Write>(mut out: W, targets: &[Target]) -> Result<(), IoError> {
    writeln!(out, "{}", targets.len())?;
    for t in targets {
        writeln!(
            out,
            "{:4} {:9.4} {:9.4} {:5} {:5} {:5} {:5} {:5}",
            t.id,
            t.x(),
            t.y(),
            t.pixel_count,
            t.width,
            t.height,
            t.sum_intensity,
            NO_CORRESPONDENCE
        )?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_targets(path: impl AsRef<Path>, targets: &[Target]) -> Result<(), IoError> {
    let file = fs::File::create(path)?;
    write_targets_to(BufWriter::new(file), targets)
}

/// Parse a legacy target file. The correspondence column is read and dropped.
pub fn read_targets_from<R: BufRead>(input: R) -> Result<Vec<Target>, IoError> {
    let mut lines = input.lines();
    let header = lines
        .next()
        .ok_or_else(|| parse_error(1, "missing target count"))??;
    let count: usize = header
        .trim()
        .parse()
        .map_err(|e| parse_error(1, format!("bad target count {header:?}: {e}")))?;

    let mut targets = Vec::with_capacity(count);
    for (idx, line) in lines.enumerate() {
        let line_no = idx + 2;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        targets.push(parse_target_line(&line, line_no)?);
    }

    if targets.len() != count {
        return Err(parse_error(
            1,
            format!("header announces {count} targets, found {}", targets.len()),
        ));
    }
    Ok(targets)
}

pub fn read_targets(path: impl AsRef<Path>) -> Result<Vec<Target>, IoError> {
    let file = fs::File::open(path)?;
    read_targets_from(BufReader::new(file))
}

fn parse_target_line(line: &str, line_no: usize) -> Result<Target, IoError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 8 {
        return Err(parse_error(
            line_no,
            format!("expected 8 columns, got {}", fields.len()),
        ));
    }

    fn field<T: std::str::FromStr>(raw: &str, name: &str, line_no: usize) -> Result<T, IoError>
    where
        T::Err: std::fmt::Display,
    {
        raw.parse()
            .map_err(|e| parse_error(line_no, format!("bad {name} {raw:?}: {e}")))
    }

    let _correspondence: i64 = field(fields[7], "correspondence", line_no)?;
    Ok(Target {
        id: field(fields[0], "id", line_no)?,
        position: Point2::new(
            field(fields[1], "x", line_no)?,
            field(fields[2], "y", line_no)?,
        ),
        pixel_count: field(fields[3], "pixel count", line_no)?,
        width: field(fields[4], "width", line_no)?,
        height: field(fields[5], "height", line_no)?,
        sum_intensity: field(fields[6], "sum intensity", line_no)?,
    })
}
