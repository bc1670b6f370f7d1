use crate::{normalize_url, TransportError};

const UPLOAD_PACK_REQUEST_TYPE: &str = "application/x-git-upload-pack-request";
const UPLOAD_PACK_RESULT_TYPE: &str = "application/x-git-upload-pack-result";

/// Blocking smart-HTTP client for one remote repository.
pub struct HttpClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpClient {
    /// Create a client for the given repository URL (with or without the
    /// `.git` suffix).
    pub fn new(repo_url: &str) -> Result<Self, TransportError> {
        Ok(Self {
            base_url: normalize_url(repo_url)?,
            client: reqwest::blocking::Client::new(),
        })
    }

    /// The normalized repository URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET the upload-pack ref advertisement.
    pub fn info_refs(&self) -> Result<Vec<u8>, TransportError> {
        let url = format!("{}/info/refs?service=git-upload-pack", self.base_url);
        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.bytes()?.to_vec())
    }

    /// POST an upload-pack request body and return the raw response bytes.
    pub fn upload_pack(&self, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let url = format!("{}/git-upload-pack", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, UPLOAD_PACK_REQUEST_TYPE)
            .header(reqwest::header::ACCEPT, UPLOAD_PACK_RESULT_TYPE)
            .body(body)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.bytes()?.to_vec())
    }
}
