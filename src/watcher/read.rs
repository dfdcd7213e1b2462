//! Build log reading.

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use super::error::LogReadError;

/// Host-provided file reading.
#[async_trait]
pub trait FileReadService: Send + Sync {
    /// Read the full contents of `path`.
    async fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

/// `FileReadService` over `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileReader;

#[async_trait]
impl FileReadService for TokioFileReader {
    async fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}

/// Read and parse one build log document.
///
/// Bytes are decoded as UTF-8 lossily; the failure path is reserved for read
/// errors and JSON syntax errors.
///
/// # Errors
///
/// Returns [`LogReadError::Read`] when the file cannot be read and
/// [`LogReadError::Parse`] when it is not one well-formed JSON document.
pub async fn load_build_log(
    reader: &dyn FileReadService,
    path: &Path,
) -> Result<Value, LogReadError> {
    let bytes = reader.read(path).await?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_valid_document() {
        let mut file = NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"[{{"path":"/p/a.ts","line":5,"column":3,"message":"type error"}}]"#
        )
        .expect("write");
        file.flush().expect("flush");

        let content = load_build_log(&TokioFileReader, file.path())
            .await
            .expect("load");

        assert_eq!(
            content,
            json!([{"path": "/p/a.ts", "line": 5, "column": 3, "message": "type error"}])
        );
    }

    #[tokio::test]
    async fn test_load_missing_file_is_read_error() {
        let result =
            load_build_log(&TokioFileReader, Path::new("/nonexistent/build/log-12345")).await;

        assert!(matches!(result, Err(LogReadError::Read(_))));
    }

    #[tokio::test]
    async fn test_load_invalid_json_is_parse_error() {
        let mut file = NamedTempFile::new().expect("tempfile");
        write!(file, "this is not json").expect("write");
        file.flush().expect("flush");

        let result = load_build_log(&TokioFileReader, file.path()).await;

        assert!(matches!(result, Err(LogReadError::Parse(_))));
    }

    #[tokio::test]
    async fn test_load_empty_file_is_parse_error() {
        let file = NamedTempFile::new().expect("tempfile");

        let result = load_build_log(&TokioFileReader, file.path()).await;

        assert!(matches!(result, Err(LogReadError::Parse(_))));
    }

    #[tokio::test]
    async fn test_load_decodes_invalid_utf8_lossily() {
        let mut file = NamedTempFile::new().expect("tempfile");
        // Invalid UTF-8 inside a JSON string becomes U+FFFD, still valid JSON.
        file.write_all(b"[{\"path\":\"/p/\xff.ts\",\"line\":1,\"column\":1,\"message\":\"m\"}]")
            .expect("write");
        file.flush().expect("flush");

        let content = load_build_log(&TokioFileReader, file.path())
            .await
            .expect("load");

        assert!(content.is_array());
    }
}
