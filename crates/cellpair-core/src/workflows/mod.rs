//! # Workflows Module
//!
//! End-to-end procedures built on [`crate::engine`] and [`crate::core`]. Each workflow takes
//! validated configuration plus a sequence of [`Frame`]s and returns plain result values,
//! reporting progress through a [`crate::engine::progress::ProgressReporter`].
//!
//! - **Evaluation** ([`evaluate`]) - energy, gradient and Hessian of every frame, with an
//!   optional finite-difference check of the analytic gradient
//! - **Pair distribution** ([`pair_distribution`]) - radial distribution function `g(r)`
//!   accumulated over frames in a periodic box

pub mod evaluate;
pub mod pair_distribution;

use crate::core::io::frame::Frame;
use crate::core::io::traits::CoordinateFile;
use crate::core::io::xyz::{XyzError, XyzFile};
use crate::engine::error::{ConfigError, PotentialError};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Evaluation of frame {frame} failed: {source}")]
    Potential {
        frame: usize,
        #[source]
        source: PotentialError,
    },

    #[error("Coordinate file error: {0}")]
    Coordinates(#[from] XyzError),

    #[error("Frame {frame} has {found} coordinates per particle, expected {expected}")]
    FrameDimension {
        frame: usize,
        expected: usize,
        found: usize,
    },

    #[error("No frames to process")]
    NoFrames,
}

impl WorkflowError {
    pub(crate) fn at_frame(frame: usize) -> impl FnOnce(PotentialError) -> Self {
        move |source| Self::Potential { frame, source }
    }
}

/// Reads every frame of an XYZ file with `ndim` coordinates per particle.
pub fn load_frames(path: impl AsRef<Path>, ndim: usize) -> Result<Vec<Frame>, WorkflowError> {
    let path = path.as_ref();
    let frames = XyzFile::read_from_path(path, ndim)?;
    info!(path = %path.display(), frames = frames.len(), "Loaded coordinate frames.");
    if frames.is_empty() {
        return Err(WorkflowError::NoFrames);
    }
    Ok(frames)
}

fn check_frame_dimension(frames: &[Frame], ndim: usize) -> Result<(), WorkflowError> {
    if frames.is_empty() {
        return Err(WorkflowError::NoFrames);
    }
    match frames.iter().position(|frame| frame.ndim != ndim) {
        Some(frame) => Err(WorkflowError::FrameDimension {
            frame,
            expected: ndim,
            found: frames[frame].ndim,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_frames_reads_files_and_rejects_empty_ones() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1\ncomment\nAr 1.0 2.0 3.0").unwrap();
        let frames = load_frames(file.path(), 3).unwrap();
        assert_eq!(frames[0].coords, vec![1.0, 2.0, 3.0]);

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            load_frames(empty.path(), 3),
            Err(WorkflowError::NoFrames)
        ));
    }

    #[test]
    fn frame_dimension_must_match() {
        let frames = vec![
            Frame::uniform("A", vec![0.0; 3], 3),
            Frame::uniform("A", vec![0.0; 4], 2),
        ];
        assert!(matches!(
            check_frame_dimension(&frames, 3),
            Err(WorkflowError::FrameDimension {
                frame: 1,
                expected: 3,
                found: 2
            })
        ));
    }
}
