// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::use_cases::scan_use_case::ScanError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if let Some(scan_error) = self.0.downcast_ref::<ScanError>() {
            return match scan_error {
                ScanError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                ScanError::NetworkUnreachable { .. } => StatusCode::BAD_GATEWAY,
            };
        }
        if self.0.downcast_ref::<validator::ValidationErrors>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "success": false, "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let invalid: AppError = ScanError::InvalidInput("bad".to_string()).into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let unreachable: AppError = ScanError::NetworkUnreachable {
            url: "https://example.com/".to_string(),
            reason: "timed out".to_string(),
        }
        .into();
        assert_eq!(unreachable.status(), StatusCode::BAD_GATEWAY);

        let other: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
