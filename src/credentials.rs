use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{credential_file_in, Config};
use crate::error::Result;

/// Stores a single personal access token in `<home>/.gfi/good-first-issues`.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
    file: PathBuf,
}

impl CredentialStore {
    pub fn new(config: &Config) -> Self {
        Self::in_dir(config.credential_dir())
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let file = credential_file_in(&dir);
        CredentialStore { dir, file }
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Replace whatever credential exists with `token`.
    ///
    /// The whole credential directory is removed and recreated, so nothing of
    /// a previous token survives.
    pub fn store(&self, token: &str) -> Result<()> {
        if self.dir.exists() {
            debug!("Removing existing credential dir {}", self.dir.display());
            fs::remove_dir_all(&self.dir)?;
        }

        fs::create_dir(&self.dir)?;
        fs::write(&self.file, token)?;

        info!("Stored credential at {}", self.file.display());
        println!("Credentials saved to {}", self.file.display());
        Ok(())
    }

    /// Return the first line of the credential file, or `None` when no
    /// credential has been stored.
    ///
    /// The line is returned exactly as read, including its terminator if the
    /// file has more than one line.
    pub fn load(&self) -> Result<Option<String>> {
        let file = match File::open(&self.file) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No credential at {}", self.file.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut line = String::new();
        BufReader::new(file).read_line(&mut line)?;
        Ok(Some(line))
    }
}
