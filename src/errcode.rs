//! FLIC error codes.

use std::error;
use std::fmt;
use std::io;

pub type FlicResult<T> = Result<T, FlicError>;

#[derive(Debug)]
pub enum FlicError {
    // More than 256 palette entries supplied.
    InvalidPaletteSize(usize),

    // A frame was supplied before any palette.
    PaletteNotSet,

    // Pixel buffer length is not a multiple of the line length.
    LineLengthMismatch,

    // IO error.
    Io(io::Error),
}

impl fmt::Display for FlicError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::FlicError::*;
        match *self {
            InvalidPaletteSize(n) => write!(f, "Invalid palette size: {}", n),
            PaletteNotSet => write!(f, "Palette not set"),
            LineLengthMismatch => write!(f, "Line length mismatch"),
            Io(ref err) => write!(f, "IO error: {}", err),
        }
    }
}

impl error::Error for FlicError {
    /// The lower level source of this error, if any.
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        use self::FlicError::*;
        match *self {
            Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for FlicError {
    fn from(err: io::Error) -> FlicError {
        FlicError::Io(err)
    }
}
