use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("backend returned {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },
    // 2xx with an unparseable body
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_exposes_detail() {
        let err = ApiError::Status {
            status: 400,
            detail: Some("Duplicate entry".to_string()),
        };
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.detail(), Some("Duplicate entry"));
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "backend returned 400: Duplicate entry");
    }

    #[test]
    fn not_found_is_detected_by_status_only() {
        let err = ApiError::Status {
            status: 404,
            detail: None,
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "backend returned 404");
        assert!(!ApiError::Transport("connection refused".into()).is_not_found());
    }
}
