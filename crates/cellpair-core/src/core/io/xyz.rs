use super::frame::Frame;
use super::traits::CoordinateFile;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Frame {frame} has {found} values, expected {expected}")]
    Inconsistent {
        frame: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error)]
pub enum XyzParseErrorKind {
    #[error("Invalid particle count '{0}'")]
    InvalidCount(String),
    #[error("Invalid coordinate '{0}'")]
    InvalidFloat(String),
    #[error("Expected a label and {expected} coordinates, found {found} fields")]
    TooFewColumns { expected: usize, found: usize },
    #[error("File ended after {found} of {expected} particle lines")]
    UnexpectedEof { expected: usize, found: usize },
}

/// Multi-frame XYZ text: a particle count line, a comment line, then one
/// `label c0 c1 [c2 ...]` line per particle, repeated for each frame.
pub struct XyzFile;

fn parse_error(line: usize, kind: XyzParseErrorKind) -> XyzError {
    XyzError::Parse { line, kind }
}

impl CoordinateFile for XyzFile {
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead, ndim: usize) -> Result<Vec<Frame>, Self::Error> {
        let mut frames = Vec::new();
        let mut lines = reader.lines().enumerate().map(|(n, l)| (n + 1, l));

        while let Some((line_num, line)) = lines.next() {
            let line = line?;
            let count_str = line.trim();
            if count_str.is_empty() {
                continue;
            }
            let count: usize = count_str.parse().map_err(|_| {
                parse_error(line_num, XyzParseErrorKind::InvalidCount(count_str.into()))
            })?;

            let comment = match lines.next() {
                Some((_, comment)) => comment?.trim().to_string(),
                None => {
                    return Err(parse_error(
                        line_num,
                        XyzParseErrorKind::UnexpectedEof {
                            expected: count,
                            found: 0,
                        },
                    ));
                }
            };

            let mut labels = Vec::with_capacity(count);
            let mut coords = Vec::with_capacity(count * ndim);
            for found in 0..count {
                let Some((atom_line_num, atom_line)) = lines.next() else {
                    return Err(parse_error(
                        line_num,
                        XyzParseErrorKind::UnexpectedEof {
                            expected: count,
                            found,
                        },
                    ));
                };
                let atom_line = atom_line?;
                let fields: Vec<&str> = atom_line.split_whitespace().collect();
                if fields.len() < ndim + 1 {
                    return Err(parse_error(
                        atom_line_num,
                        XyzParseErrorKind::TooFewColumns {
                            expected: ndim,
                            found: fields.len(),
                        },
                    ));
                }
                labels.push(fields[0].to_string());
                for value in &fields[1..=ndim] {
                    let x: f64 = value.parse().map_err(|_| {
                        parse_error(
                            atom_line_num,
                            XyzParseErrorKind::InvalidFloat((*value).into()),
                        )
                    })?;
                    coords.push(x);
                }
            }

            frames.push(Frame {
                comment,
                labels,
                coords,
                ndim,
            });
        }

        Ok(frames)
    }

    fn write_to(frames: &[Frame], writer: &mut impl Write) -> Result<(), Self::Error> {
        for (index, frame) in frames.iter().enumerate() {
            let expected = frame.particle_count() * frame.ndim;
            if frame.coords.len() != expected {
                return Err(XyzError::Inconsistent {
                    frame: index,
                    expected,
                    found: frame.coords.len(),
                });
            }
            writeln!(writer, "{}", frame.particle_count())?;
            writeln!(writer, "{}", frame.comment)?;
            for (label, values) in frame.labels.iter().zip(frame.coords.chunks(frame.ndim)) {
                write!(writer, "{:<4}", label)?;
                for value in values {
                    write!(writer, " {:>20.12}", value)?;
                }
                writeln!(writer)?;
            }
        }
        Ok(())
    }
}
