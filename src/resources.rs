use std::ffi;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("file contains nil")]
    FileContainsNil,
    #[error("failed to get current directory")]
    FailedToGetCurrentDir,
}

/// Shader files are looked up below `root_path`.
#[derive(Debug, Clone)]
pub struct Resources {
    root_path: PathBuf,
}

impl Resources {
    pub fn from_path<P: Into<PathBuf>>(root_path: P) -> Resources {
        Resources {
            root_path: root_path.into(),
        }
    }

    pub fn from_current_dir() -> Result<Resources, ResError> {
        let root_path = std::env::current_dir().map_err(|_| ResError::FailedToGetCurrentDir)?;
        Ok(Resources { root_path })
    }

    /// Absolute resource names are taken as they are.
    pub fn resolve(&self, resource_name: &Path) -> PathBuf {
        self.root_path.join(resource_name)
    }

    pub fn load_cstring(&self, resource_name: &Path) -> Result<ffi::CString, ResError> {
        let mut file = fs::File::open(self.resolve(resource_name))?;

        // allocate buffer of the same size as file
        let mut buffer: Vec<u8> = Vec::with_capacity(file.metadata()?.len() as usize + 1);
        file.read_to_end(&mut buffer)?;

        ffi::CString::new(buffer).map_err(|_| ResError::FileContainsNil)
    }
}
