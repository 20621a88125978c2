use crate::error::Error;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// A program image and, when it came from disk, where to reload it from
#[derive(Debug, Default)]
pub struct Rom {
    pub instructions: Vec<u8>,
    path: Option<PathBuf>,
}

impl Rom {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let instructions = read_image(path)?;
        if instructions.is_empty() {
            log::warn!("{} is empty", path.display());
        }

        Ok(Self {
            instructions,
            path: Some(path.to_path_buf()),
        })
    }

    #[cfg(test)]
    pub fn from_bytes(instructions: Vec<u8>) -> Self {
        Self {
            instructions,
            path: None,
        }
    }

    /// Re-read the image from disk. In-memory images stay as they are.
    pub fn reload(&mut self) -> Result<(), Error> {
        if let Some(path) = &self.path {
            self.instructions = read_image(path)?;
            log::info!("reloaded {} ({} bytes)", path.display(), self.instructions.len());
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn read_image(path: &Path) -> Result<Vec<u8>, Error> {
    let rom_error = |source| Error::Rom {
        path: path.to_path_buf(),
        source,
    };

    let mut buffer = BufReader::new(File::open(path).map_err(rom_error)?);
    let mut instructions = Vec::new();
    buffer.read_to_end(&mut instructions).map_err(rom_error)?;

    Ok(instructions)
}
