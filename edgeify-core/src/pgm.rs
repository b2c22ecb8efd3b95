//! ASCII PGM (`P2`) reading and writing.
//!
//! Layout: the `P2` magic, then `cols rows`, then the max intensity, then
//! `rows * cols` whitespace-separated pixel values in row-major order. A `#`
//! starts a comment that runs to the end of its line.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::buffer::{ImageBuffer, ImageError, MAX_INTENSITY_8BIT};

pub const MAGIC: &str = "P2";

/// Header fields, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Width,
    Height,
    MaxIntensity,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeaderField::Width => "width",
            HeaderField::Height => "height",
            HeaderField::MaxIntensity => "max intensity",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PgmError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("not an ASCII PGM file: expected magic 'P2', found '{0}'")]
    BadMagic(String),
    #[error("missing header field: {0}")]
    MissingField(HeaderField),
    #[error("invalid {field}: '{value}'")]
    InvalidField { field: HeaderField, value: String },
    #[error("max intensity {0} is not supported (8-bit images only)")]
    UnsupportedMaxIntensity(u32),
    #[error("invalid pixel #{index}: '{token}'")]
    InvalidPixel { index: usize, token: String },
    #[error("pixel #{index} is {value}, above max intensity {max}")]
    PixelOutOfRange { index: usize, value: u32, max: u16 },
    #[error("image of {cols}x{rows} pixels is too large")]
    TooLarge { cols: usize, rows: usize },
    #[error("expected {expected} pixels, found {found}")]
    PixelCount { expected: usize, found: usize },
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Whitespace tokens with `#` comments removed.
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        })
        .flat_map(str::split_whitespace)
}

fn header_value<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    field: HeaderField,
) -> Result<u32, PgmError> {
    let token = tokens.next().ok_or(PgmError::MissingField(field))?;
    match token.parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(PgmError::InvalidField {
            field,
            value: token.to_string(),
        }),
    }
}

/// Parse a complete P2 document.
pub fn parse_pgm(text: &str) -> Result<ImageBuffer, PgmError> {
    let mut tokens = tokens(text);

    match tokens.next() {
        Some(MAGIC) => {}
        Some(other) => return Err(PgmError::BadMagic(other.to_string())),
        None => return Err(PgmError::BadMagic(String::new())),
    }

    let cols = header_value(&mut tokens, HeaderField::Width)? as usize;
    let rows = header_value(&mut tokens, HeaderField::Height)? as usize;
    let max = header_value(&mut tokens, HeaderField::MaxIntensity)?;
    if max > u32::from(MAX_INTENSITY_8BIT) {
        return Err(PgmError::UnsupportedMaxIntensity(max));
    }
    let max = max as u16;

    let expected = rows
        .checked_mul(cols)
        .ok_or(PgmError::TooLarge { cols, rows })?;
    // Every pixel takes at least two bytes of text
    let mut data = Vec::with_capacity(expected.min(text.len() / 2 + 1));
    let mut found = 0usize;
    for (index, token) in tokens.enumerate() {
        found += 1;
        if index >= expected {
            continue;
        }
        let value: u32 = token.parse().map_err(|_| PgmError::InvalidPixel {
            index,
            token: token.to_string(),
        })?;
        if value > u32::from(max) {
            return Err(PgmError::PixelOutOfRange { index, value, max });
        }
        data.push(value as u8);
    }

    if found != expected {
        return Err(PgmError::PixelCount { expected, found });
    }

    debug!("parsed P2 image {}x{} (max {})", cols, rows, max);
    Ok(ImageBuffer::from_vec(rows, cols, max, data)?)
}

pub fn read_pgm<R: BufRead>(mut reader: R) -> Result<ImageBuffer, PgmError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_pgm(&text)
}

pub fn load_pgm(path: &Path) -> Result<ImageBuffer, PgmError> {
    let file = File::open(path)?;
    read_pgm(BufReader::new(file))
}

/// True when the path ends in `.pgm` (any case).
pub fn is_pgm_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pgm"))
        .unwrap_or(false)
}

/// Serialize as P2, one image row per line.
pub fn write_pgm<W: Write>(
    mut writer: W,
    img: &ImageBuffer,
    comment: Option<&str>,
) -> io::Result<()> {
    writeln!(writer, "{}", MAGIC)?;
    if let Some(comment) = comment {
        writeln!(writer, "#{}", comment.replace(['\n', '\r'], " "))?;
    }
    writeln!(writer, "{} {}", img.cols(), img.rows())?;
    writeln!(writer, "{}", img.max_intensity())?;

    for row in img.pixels().rows() {
        let mut first = true;
        for v in row {
            if !first {
                writer.write_all(b" ")?;
            }
            write!(writer, "{}", v)?;
            first = false;
        }
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

pub fn save_pgm(path: &Path, img: &ImageBuffer, comment: Option<&str>) -> Result<(), PgmError> {
    let file = File::create(path)?;
    write_pgm(BufWriter::new(file), img, comment)?;
    debug!("wrote {}", path.display());
    Ok(())
}
