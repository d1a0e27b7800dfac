use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ListDirQuery {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    /// The directory the file was stored in, as the client sent it.
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct ViewFileQuery {
    pub path: String,
}
