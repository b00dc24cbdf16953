/// Content type sent when the file extension says nothing useful.
pub const DEFAULT_CONTENT_TYPE: &str = "application/epub+zip";

/// Form field the device expects the file under.
pub const FIELD_NAME: &str = "newfile";

const CRLF: &[u8] = b"\r\n";

/// A `multipart/form-data` request body carrying exactly one file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    /// Encode `data` as a single `newfile` part under a fresh UUID boundary.
    ///
    /// The boundary is not checked against the payload.
    pub fn single_file(data: &[u8], filename: &str, content_type: &str) -> Self {
        let boundary = uuid::Uuid::new_v4().to_string();
        Self::with_boundary(boundary, data, filename, content_type)
    }

    pub fn with_boundary(
        boundary: impl Into<String>,
        data: &[u8],
        filename: &str,
        content_type: &str,
    ) -> Self {
        let boundary = boundary.into();
        let disposition = format!(
            "Content-Disposition: form-data; name=\"{FIELD_NAME}\"; filename=\"{}\"",
            escape_filename(filename)
        );
        let opening = format!("--{boundary}");
        let part_type = format!("Content-Type: {content_type}");
        let closing = format!("--{boundary}--");
        let lines: [&[u8]; 7] = [
            opening.as_bytes(),
            disposition.as_bytes(),
            part_type.as_bytes(),
            b"",
            data,
            closing.as_bytes(),
            b"",
        ];
        let body = lines.join(CRLF);
        Self { boundary, body }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type_header(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// Guess a MIME type from the filename extension.
pub fn guess_content_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first()
        .map(|mime| mime.to_string())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

// Quotes and line breaks would end the header early.
fn escape_filename(filename: &str) -> String {
    filename
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
