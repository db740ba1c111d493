//! Capability-scoped filesystem helpers built on `cap-std` and `camino`.

use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};

/// Open the parent directory of `path` and return it with the file name.
fn open_parent(path: &Utf8Path) -> io::Result<(Dir, String)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("'{path}' has no file name")))?
        .to_owned();
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Read a UTF-8 file through its parent directory capability.
///
/// # Errors
/// Returns the underlying I/O error when the parent cannot be opened or the
/// file cannot be read as UTF-8.
pub fn read_utf8_file(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = open_parent(path)?;
    dir.read_to_string(name)
}

/// Whether `path` names an existing regular file.
///
/// # Errors
/// Returns the underlying I/O error, `NotFound` included, when the entry
/// cannot be inspected.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_parent(path)?;
    dir.metadata(name).map(|meta| meta.is_file())
}

/// Create `path` and any missing ancestors, then open it.
pub(crate) fn create_dir_all(path: &Utf8Path) -> io::Result<Dir> {
    let (base, relative) = split_base(path)?;
    if relative.as_str().is_empty() {
        return Ok(base);
    }
    base.create_dir_all(&relative)?;
    base.open_dir(&relative)
}

/// Split a path into an ambient root (filesystem root, drive prefix or the
/// current directory) and the remainder relative to it.
fn split_base(path: &Utf8Path) -> io::Result<(Dir, Utf8PathBuf)> {
    let mut components = path.components();
    let base = match components.next() {
        Some(Utf8Component::Prefix(prefix)) => {
            let mut base = Utf8PathBuf::from(prefix.as_str());
            if matches!(components.clone().next(), Some(Utf8Component::RootDir)) {
                components.next();
                base.push(std::path::MAIN_SEPARATOR_STR);
            }
            base
        }
        Some(Utf8Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => {
            components = path.components();
            Utf8PathBuf::from(".")
        }
    };
    let dir = Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, components.as_path().to_path_buf()))
}
