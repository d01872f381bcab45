//! The caller's Ed25519 secret key, persisted as a single hex line.

use std::io::Write;
use std::path::Path;

use linkshelf_shared::identity::Identity;

use crate::error::{ClientError, Result};

/// Read the identity stored at `path`, `None` if the file does not exist.
pub fn load_identity(path: &Path) -> Result<Option<Identity>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ClientError::KeyFile(format!("{}: {e}", path.display()))),
    };

    let identity = Identity::from_secret_hex(&contents)
        .map_err(|e| ClientError::KeyFile(format!("{}: corrupt key: {e}", path.display())))?;
    Ok(Some(identity))
}

/// Write `identity` to `path`, creating parent directories. On Unix the file
/// is readable by its owner only.
pub fn save_identity(path: &Path, identity: &Identity) -> Result<()> {
    let io_err = |e: std::io::Error| ClientError::KeyFile(format!("{}: {e}", path.display()));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(io_err)?;

    // `mode` only applies on creation; tighten a pre-existing file too
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .map_err(io_err)?;
    }

    writeln!(file, "{}", identity.secret_hex()).map_err(io_err)?;

    tracing::info!(
        path = %path.display(),
        principal = %identity.principal().short(),
        "identity saved"
    );
    Ok(())
}

/// Load the identity at `path`, generating and saving a new one if absent.
pub fn load_or_create_identity(path: &Path) -> Result<Identity> {
    if let Some(identity) = load_identity(path)? {
        return Ok(identity);
    }
    let identity = Identity::generate();
    save_identity(path, &identity)?;
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_identity(&dir.path().join("none.key")).unwrap().is_none());
    }

    #[test]
    fn create_then_load_same_principal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys").join("identity.key");

        let created = load_or_create_identity(&path).unwrap();
        let loaded = load_or_create_identity(&path).unwrap();
        assert_eq!(created.principal(), loaded.principal());
    }

    #[cfg(unix)]
    #[test]
    fn key_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.key");
        save_identity(&path, &Identity::generate()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn overwritten_key_file_is_made_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.key");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let identity = Identity::generate();
        save_identity(&path, &identity).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        let loaded = load_identity(&path).unwrap().unwrap();
        assert_eq!(loaded.principal(), identity.principal());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.key");
        std::fs::write(&path, "not hex").unwrap();
        assert!(matches!(load_identity(&path), Err(ClientError::KeyFile(_))));
    }
}
