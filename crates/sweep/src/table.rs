use netda_runner::WelfareRatios;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::config::SweepParameter;
use crate::error::{SweepError, SweepResult};

/// Averaged welfare ratios per parameter value
///
/// Rendered as whitespace-delimited text:
///
/// ```text
/// opt=<parameter>
/// <parameter values>
/// <optimal ratios>
/// <static MTR ratios>
/// <DTR ratios>
/// ```
///
/// followed by a blank line.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    parameter: SweepParameter,
    points: Vec<f64>,
    ratios: Vec<WelfareRatios>,
}

impl ResultTable {
    pub fn new(parameter: SweepParameter) -> Self {
        Self {
            parameter,
            points: Vec::new(),
            ratios: Vec::new(),
        }
    }

    pub fn push(&mut self, value: f64, ratios: WelfareRatios) {
        self.points.push(value);
        self.ratios.push(ratios);
    }

    pub fn parameter(&self) -> SweepParameter {
        self.parameter
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn ratios(&self) -> &[WelfareRatios] {
        &self.ratios
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append the rendered table to `path`, creating it if needed
    pub fn append_to(&self, path: impl AsRef<Path>) -> SweepResult<()> {
        let path = path.as_ref();
        let io_error = |source: std::io::Error| SweepError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_error)?;
        write!(file, "{}", self).map_err(io_error)?;
        file.flush().map_err(io_error)
    }
}

fn write_row<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    row: impl Iterator<Item = T>,
) -> fmt::Result {
    for (i, value) in row.enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", value)?;
    }
    writeln!(f)
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "opt={}", self.parameter.name())?;
        write_row(f, self.points.iter())?;
        for stage in 0..3 {
            write_row(f, self.ratios.iter().map(|r| r.as_array()[stage]))?;
        }
        writeln!(f)
    }
}
