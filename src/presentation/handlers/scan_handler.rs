// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use validator::Validate;

use crate::application::dto::scan_request::ScanRequestDto;
use crate::application::use_cases::scan_use_case::ScanUseCase;
use crate::presentation::errors::AppError;

/// 扫描站点
///
/// 同步执行完整扫描并返回报告
pub async fn create_scan(
    Extension(use_case): Extension<Arc<ScanUseCase>>,
    Json(payload): Json<ScanRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let report = use_case.execute(&payload.url).await?;
    Ok((StatusCode::OK, Json(report)))
}
