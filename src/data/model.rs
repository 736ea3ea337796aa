use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SpectrumPoint – one (m/z, cps) sample of the processed spectrum
// ---------------------------------------------------------------------------

/// A single point of the summarised spectrum returned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumPoint {
    /// Mass-to-charge ratio (x axis).
    pub x: f64,
    /// Intensity in counts per second (y axis).
    pub cps: f64,
}

impl fmt::Display for SpectrumPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m/z {:.2}, {:.1} cps", self.x, self.cps)
    }
}

// ---------------------------------------------------------------------------
// TabFile – the raw instrument file picked by the operator
// ---------------------------------------------------------------------------

/// File name plus raw contents. The contents are never parsed client-side.
#[derive(Clone, PartialEq, Eq)]
pub struct TabFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl TabFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its final path component as name.
    pub fn read(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("{} has no usable file name", path.display()))?
            .to_string();
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(Self { name, bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Contents can be megabytes; keep them out of logs.
impl fmt::Debug for TabFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_keeps_file_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.tab");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"END\n1\t2\t3\t4\n").unwrap();

        let file = TabFile::read(&path).unwrap();
        assert_eq!(file.name, "scan.tab");
        assert_eq!(file.bytes, b"END\n1\t2\t3\t4\n");
        assert_eq!(file.len(), 13);
        assert!(!file.is_empty());
    }

    #[test]
    fn empty_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.tab");
        std::fs::File::create(&path).unwrap();

        let file = TabFile::read(&path).unwrap();
        assert!(file.is_empty());
        assert_eq!(file.len(), 0);
    }

    #[test]
    fn read_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TabFile::read(&dir.path().join("missing.tab")).unwrap_err();
        assert!(format!("{err:#}").contains("missing.tab"));
    }

    #[test]
    fn debug_omits_contents() {
        let file = TabFile::new("a.tab", vec![0xAB; 4]);
        assert_eq!(format!("{file:?}"), r#"TabFile { name: "a.tab", len: 4 }"#);
    }
}
