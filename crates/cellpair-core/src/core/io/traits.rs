use super::frame::Frame;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing multi-frame coordinate files.
///
/// Implementors handle format-specific parsing and serialization; the path-based methods
/// are provided on top of the reader/writer ones.
pub trait CoordinateFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads every frame from a buffered reader, keeping `ndim` coordinates per particle.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead, ndim: usize) -> Result<Vec<Frame>, Self::Error>;

    /// Writes frames to a writer, one block per frame.
    ///
    /// # Errors
    ///
    /// Returns an error if a frame is malformed or writing fails.
    fn write_to(frames: &[Frame], writer: &mut impl Write) -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(path: P, ndim: usize) -> Result<Vec<Frame>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, ndim)
    }

    fn write_to_path<P: AsRef<Path>>(frames: &[Frame], path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(frames, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
