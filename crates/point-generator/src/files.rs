//! Reading and writing series-key and field-map files.

use crate::error::GeneratorError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Default buffer size for file writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Read a series-key file: one key per line, taken verbatim.
///
/// Blank lines become empty keys; `\r\n` line endings are accepted.
pub fn read_series_keys<P: AsRef<Path>>(path: P) -> Result<Vec<String>, GeneratorError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e))?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Write one series key per line. Returns the number of keys written.
pub fn write_series_keys<P, I, K>(path: P, keys: I) -> Result<usize, GeneratorError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = K>,
    K: AsRef<[u8]>,
{
    let path = path.as_ref();
    let mut writer = create(path)?;
    let mut written = 0;

    for key in keys {
        writer
            .write_all(key.as_ref())
            .and_then(|()| writer.write_all(b"\n"))
            .map_err(|e| GeneratorError::io(path, e))?;
        written += 1;
    }

    writer.flush().map_err(|e| GeneratorError::io(path, e))?;
    info!("Wrote {} series keys to '{}'", written, path.display());
    Ok(written)
}

/// Write `<prefix> <descriptor>` lines. Returns the number of entries written.
///
/// A prefix containing a space, comma or line break could not be read back
/// and is rejected.
pub fn write_field_map<P, I, A, B>(path: P, entries: I) -> Result<usize, GeneratorError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (A, B)>,
    A: AsRef<str>,
    B: AsRef<str>,
{
    let path = path.as_ref();
    let mut writer = create(path)?;
    let mut written = 0;

    for (prefix, descriptor) in entries {
        let (prefix, descriptor) = (prefix.as_ref(), descriptor.as_ref());
        if prefix.contains([' ', ',', '\n', '\r']) || descriptor.contains(['\n', '\r']) {
            return Err(GeneratorError::MalformedFieldMap {
                line: written + 1,
                content: format!("{prefix} {descriptor}"),
            });
        }

        writeln!(writer, "{prefix} {descriptor}").map_err(|e| GeneratorError::io(path, e))?;
        written += 1;
    }

    writer.flush().map_err(|e| GeneratorError::io(path, e))?;
    info!("Wrote {} field map entries to '{}'", written, path.display());
    Ok(written)
}

fn create(path: &Path) -> Result<BufWriter<File>, GeneratorError> {
    let file = File::create(path).map_err(|e| GeneratorError::io(path, e))?;
    Ok(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_map::{DuplicatePrefixPolicy, FieldMap};
    use tempfile::TempDir;

    #[test]
    fn test_series_keys_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("series.txt");

        let written = write_series_keys(&path, ["cpu,host=a", "cpu,host=b"]).unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            read_series_keys(&path).unwrap(),
            vec!["cpu,host=a", "cpu,host=b"]
        );
    }

    #[test]
    fn test_read_series_keys_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("series.txt");
        fs::write(&path, "cpu,host=a\r\n\nmem ,x=y").unwrap();

        assert_eq!(
            read_series_keys(&path).unwrap(),
            vec!["cpu,host=a", "", "mem ,x=y"]
        );
    }

    #[test]
    fn test_read_missing_series_file() {
        let err = read_series_keys("/nonexistent/series.txt").unwrap_err();
        assert!(matches!(err, GeneratorError::Io { .. }));
    }

    #[test]
    fn test_field_map_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fields.txt");

        write_field_map(&path, [("cpu", "a=1i,b=2.0"), ("mem", "free=0i")]).unwrap();

        let map = FieldMap::from_file(&path, DuplicatePrefixPolicy::Reject).unwrap();
        assert_eq!(map.get("cpu"), Some("a=1i,b=2.0"));
        assert_eq!(map.get("mem"), Some("free=0i"));
    }

    #[test]
    fn test_write_field_map_rejects_bad_prefix() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fields.txt");

        let err = write_field_map(&path, [("cpu,host=a", "a=1i")]).unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedFieldMap { line: 1, .. }));
    }
}
