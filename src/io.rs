// File-level helpers for filling a model.
//
// Provides `load_file()` / `load_files()` that read whole files (or stdin,
// spelled `-`) into a `MultidiffModel`, labelling each object with its path.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use log::info;

use crate::model::{DiffObject, MultidiffModel};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `load_files()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Objects appended to the model.
    pub objects: usize,
    /// Total bytes read.
    pub total_bytes: u64,
    /// Size of the largest object.
    pub largest: u64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for loading objects.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("stdin can only be read once")]
    StdinTwice,
}

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

/// The path that stands for standard input.
pub const STDIN_PATH: &str = "-";

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN_PATH
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read everything from `reader` into a named object.
pub fn read_object<R: Read>(reader: R, name: impl Into<String>) -> io::Result<DiffObject> {
    let mut data = Vec::new();
    BufReader::with_capacity(BUF_SIZE, reader).read_to_end(&mut data)?;
    Ok(DiffObject::new(data, name))
}

/// Read one file (or stdin for `-`) into a named object.
pub fn open_object(path: &Path) -> Result<DiffObject, LoadError> {
    let wrap = |source: io::Error| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let name = path.display().to_string();
    if is_stdin(path) {
        read_object(io::stdin().lock(), name).map_err(wrap)
    } else {
        let file = File::open(path).map_err(wrap)?;
        read_object(file, name).map_err(wrap)
    }
}

/// Append one file to the model and return its index.
pub fn load_file(model: &mut MultidiffModel, path: &Path) -> Result<usize, LoadError> {
    let object = open_object(path)?;
    info!("loaded {} ({} bytes)", object.name(), object.len());
    Ok(model.push(object))
}

/// Append files to the model in order.
///
/// Fails on the first unreadable path; objects loaded before it stay in
/// the model.
pub fn load_files<P: AsRef<Path>>(
    model: &mut MultidiffModel,
    paths: &[P],
) -> Result<LoadStats, LoadError> {
    if paths.iter().filter(|p| is_stdin(p.as_ref())).count() > 1 {
        return Err(LoadError::StdinTwice);
    }

    let mut stats = LoadStats::default();
    for path in paths {
        let index = load_file(model, path.as_ref())?;
        let len = model.objects()[index].len() as u64;
        stats.objects += 1;
        stats.total_bytes += len;
        stats.largest = stats.largest.max(len);
    }
    Ok(stats)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_object_from_reader() {
        let obj = read_object(&b"payload"[..], "mem").unwrap();
        assert_eq!(obj.data(), b"payload");
        assert_eq!(obj.name(), "mem");
    }

    #[test]
    fn load_files_labels_with_paths() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        std::fs::write(&a, b"\x00\x01\x02").unwrap();
        std::fs::write(&b, b"\x00\x01\x02\x03\x04").unwrap();

        let mut model = MultidiffModel::new();
        let stats = load_files(&mut model, &[&a, &b]).unwrap();
        assert_eq!(
            stats,
            LoadStats {
                objects: 2,
                total_bytes: 8,
                largest: 5,
            }
        );
        assert_eq!(model.objects()[0].name(), a.display().to_string());
        assert_eq!(model.objects()[1].data(), b"\x00\x01\x02\x03\x04");
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.bin");
        let mut model = MultidiffModel::new();
        let err = load_file(&mut model, &missing).unwrap_err();
        assert!(err.to_string().contains("nope.bin"), "{err}");
        assert!(model.is_empty());
    }

    #[test]
    fn stdin_only_once() {
        let mut model = MultidiffModel::new();
        let err = load_files(&mut model, &["-", "-"]).unwrap_err();
        assert!(matches!(err, LoadError::StdinTwice));
    }
}
