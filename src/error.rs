use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync;

// Import the minifb error type and rename it to avoid name conflicts
use minifb::Error as MinifbError;

/// A custom error type for the CHIP-8 virtual machine
#[derive(Debug)]
pub enum Error {
    /// I/O errors not tied to a program image
    Io(io::Error),
    /// The program image at `path` could not be read
    Rom { path: PathBuf, source: io::Error },
    /// A CALL was made with all 16 stack slots in use
    StackOverflow(u16),
    /// A RET was made with an empty stack
    StackUnderflow,
    /// Register index outside V0..=VF
    #[cfg(test)]
    InvalidRegister(u8),
    /// Errors resulting from poisoned mutex locks
    Poison(String),
    /// Errors from the minifb graphics library
    Minifb(MinifbError),
    /// Errors from the audio output device
    Audio(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO Error: {}", e),
            Error::Rom { path, source } => {
                write!(f, "Failed to load program {}: {}", path.display(), source)
            }
            Error::StackOverflow(addr) => {
                write!(f, "Stack overflow: call from {:#05x} with 16 frames in use", addr)
            }
            Error::StackUnderflow => write!(f, "Stack underflow: return with an empty stack"),
            #[cfg(test)]
            Error::InvalidRegister(index) => write!(f, "Invalid register V{:X}", index),
            Error::Poison(msg) => write!(f, "Mutex Poison Error: {}", msg),
            Error::Minifb(e) => write!(f, "Minifb Error: {}", e),
            Error::Audio(msg) => write!(f, "Audio Error: {}", msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Rom { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl<T> From<sync::PoisonError<T>> for Error {
    fn from(err: sync::PoisonError<T>) -> Self {
        Error::Poison(format!("Mutex poisoned: {}", err))
    }
}

impl From<MinifbError> for Error {
    fn from(err: MinifbError) -> Self {
        Error::Minifb(err)
    }
}
