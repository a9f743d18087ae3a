use crate::error::{ProcessingError, Result};
use encoding_rs::Encoding;
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Loads an input file as text, decoding it with the configured encoding.
///
/// A byte order mark overrides the configured encoding and is stripped.
#[derive(Debug, Clone, Copy)]
pub struct SourceReader {
    encoding: &'static Encoding,
    use_mmap: bool,
}

impl SourceReader {
    pub fn new(encoding_label: &str, use_mmap: bool) -> Result<Self> {
        let encoding = Encoding::for_label(encoding_label.trim().as_bytes())
            .ok_or_else(|| ProcessingError::UnsupportedEncoding(encoding_label.to_string()))?;
        Ok(Self { encoding, use_mmap })
    }

    pub fn utf8() -> Self {
        Self {
            encoding: encoding_rs::UTF_8,
            use_mmap: false,
        }
    }

    pub fn read_to_string(&self, path: &Path) -> Result<String> {
        let input_error = |e| ProcessingError::InputFile(path.to_path_buf(), e);
        let mut file = File::open(path).map_err(input_error)?;

        if self.use_mmap {
            let mmap = unsafe { Mmap::map(&file).map_err(input_error)? };
            Ok(self.decode(&mmap, path))
        } else {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes).map_err(input_error)?;
            Ok(self.decode(&bytes, path))
        }
    }

    /// Open a header-aware CSV reader over the decoded text.
    pub fn csv_reader<'a>(&self, text: &'a str) -> csv::Reader<&'a [u8]> {
        csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(text.as_bytes())
    }

    fn decode(&self, bytes: &[u8], path: &Path) -> String {
        let (text, used, had_errors) = self.encoding.decode(bytes);
        if had_errors {
            warn!(
                file = %path.display(),
                encoding = used.name(),
                "Input contains byte sequences invalid for its encoding; replaced them"
            );
        }
        debug!(file = %path.display(), encoding = used.name(), bytes = bytes.len(), "Decoded input");
        text.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_bom_is_stripped() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"\xEF\xBB\xBFstation_id,station_name\n1,A\n")?;

        let text = SourceReader::utf8().read_to_string(file.path())?;
        assert!(text.starts_with("station_id"));
        Ok(())
    }

    #[test]
    fn test_gbk_decoding() -> Result<()> {
        let (encoded, _, _) = encoding_rs::GBK.encode("station_name\n人民广场\n");
        let mut file = NamedTempFile::new()?;
        file.write_all(&encoded)?;

        let reader = SourceReader::new("gbk", false)?;
        let text = reader.read_to_string(file.path())?;
        assert!(text.contains("人民广场"));

        let mapped = SourceReader::new("gbk", true)?.read_to_string(file.path())?;
        assert_eq!(mapped, text);
        Ok(())
    }

    #[test]
    fn test_unknown_encoding_label() {
        let result = SourceReader::new("klingon", false);
        assert!(matches!(result, Err(ProcessingError::UnsupportedEncoding(_))));
    }

    #[test]
    fn test_missing_file_names_path() {
        let result = SourceReader::utf8().read_to_string(Path::new("/nonexistent/trips.csv"));
        match result {
            Err(ProcessingError::InputFile(path, _)) => {
                assert_eq!(path, Path::new("/nonexistent/trips.csv"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
