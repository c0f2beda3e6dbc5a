//! [`FileTokenStorage`]: keeps the session token in a single file.

use std::{
  fs, io,
  path::{Path, PathBuf},
};

use attend_core::session::TokenStorage;

/// Persists the bearer token as the sole contents of a file.
///
/// The parent directory is created on first write; clearing the token
/// removes the file.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
  path: PathBuf,
}

impl FileTokenStorage {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }
}

impl TokenStorage for FileTokenStorage {
  fn load(&self) -> io::Result<Option<String>> {
    match fs::read_to_string(&self.path) {
      Ok(raw) => {
        let token = raw.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e),
    }
  }

  fn store(&self, token: Option<&str>) -> io::Result<()> {
    let Some(token) = token else {
      return match fs::remove_file(&self.path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
      };
    };

    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(&self.path, token)?;

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt as _;
      fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
  }
}
