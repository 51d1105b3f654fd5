/// A file handed to the extract-text stage: plain text, a PDF, or an image,
/// tagged with its MIME type.
#[derive(Clone, Debug)]
pub struct FilePayload {
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl FilePayload {
    pub fn new(filename: &str, mime_type: &str, data: Vec<u8>) -> FilePayload {
        return FilePayload {
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            data,
        };
    }

    pub fn is_pdf(&self) -> bool {
        return self.mime_type == "application/pdf";
    }

    pub fn is_image(&self) -> bool {
        return self.mime_type.starts_with("image/");
    }

    pub fn is_text(&self) -> bool {
        return self.mime_type.starts_with("text/")
            || self.mime_type == "application/json"
            || self.mime_type == "text/csv";
    }
}
