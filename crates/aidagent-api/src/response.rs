use serde::Serialize;

/// Response envelope shared by every route.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub response_type: String,
    pub description: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(status_code: u16, description: impl Into<String>, data: T) -> Self {
        Self {
            status_code,
            response_type: "success".to_string(),
            description: description.into(),
            data: Some(data),
        }
    }
}
