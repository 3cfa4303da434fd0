//! MIME type inference
//!
//! Maps file extensions to Content-Type values for files served out of the
//! data directory.

/// Infer the Content-Type from a file extension.
///
/// Unknown or missing extensions fall back to `application/octet-stream`,
/// which makes the client treat the payload as opaque bytes.
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    match extension {
        // Markup and text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md" | "log") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",

        // Data formats commonly dropped into the data directory
        Some("json" | "geojson") => "application/json",
        Some("ndjson" | "jsonl") => "application/x-ndjson",
        Some("csv") => "text/csv; charset=utf-8",
        Some("tsv") => "text/tab-separated-values; charset=utf-8",
        Some("yaml" | "yml") => "application/yaml",

        // Scripts
        Some("js" | "mjs") => "application/javascript",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Archives
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",
        Some("tar") => "application/x-tar",

        // Documents
        Some("pdf") => "application/pdf",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_types() {
        assert_eq!(content_type_for(Some("html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Some("htm")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Some("css")), "text/css");
    }

    #[test]
    fn test_data_types() {
        assert_eq!(content_type_for(Some("json")), "application/json");
        assert_eq!(content_type_for(Some("csv")), "text/csv; charset=utf-8");
        assert_eq!(content_type_for(Some("ndjson")), "application/x-ndjson");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(content_type_for(Some("xyz")), "application/octet-stream");
        assert_eq!(content_type_for(None), "application/octet-stream");
    }
}
