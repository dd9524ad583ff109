use std::path::Path;

use anyhow::Context;
use bytes::Bytes;

use dealdesk_core::SelectedFile;

/// Human-readable byte count in binary units.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// MIME type from a filename's extension. Octet-stream when unknown; the
/// server classifies uploads itself, this only labels the multipart parts.
pub fn guess_content_type(filename: &str) -> &'static str {
    let extension = filename.rsplit('.').next().map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}

/// Read local files into upload selections, naming each part after the file
/// and labelling it by extension.
pub fn read_selected_files<P: AsRef<Path>>(paths: &[P]) -> anyhow::Result<Vec<SelectedFile>> {
    let mut selected = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        let content_type = guess_content_type(&name);
        selected.push(SelectedFile::new(name, content_type, Bytes::from(data)));
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_plain() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1023), "1023 B");
    }

    #[test]
    fn format_bytes_scaled() {
        assert_eq!(format_bytes(1024), "1.0 KiB");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(1024 * 1024), "1.0 MiB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.0 GiB");
    }

    #[test]
    fn guess_content_type_known_extensions() {
        assert_eq!(guess_content_type("deck.pdf"), "application/pdf");
        assert_eq!(guess_content_type("LOGO.PNG"), "image/png");
        assert_eq!(guess_content_type("photo.jpeg"), "image/jpeg");
        assert_eq!(guess_content_type("books.csv"), "text/csv");
    }

    #[test]
    fn guess_content_type_defaults_to_octet_stream() {
        assert_eq!(guess_content_type("archive.tar.gz"), "application/octet-stream");
        assert_eq!(guess_content_type("README"), "application/octet-stream");
        assert_eq!(guess_content_type(""), "application/octet-stream");
    }

    #[test]
    fn read_selected_files_reads_and_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pitch.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let files = read_selected_files(&[&path]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "pitch.pdf");
        assert_eq!(files[0].content_type, "application/pdf");
        assert_eq!(files[0].size(), 8);
    }

    #[test]
    fn read_selected_files_fails_on_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.pdf");
        assert!(read_selected_files(&[&missing]).is_err());
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
