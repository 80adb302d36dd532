//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::PlacepinError;

use super::error_code::ErrorCode;
use super::types::{ApiResponse, PaginatedResponse, PaginationInfo};

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建 201 Created 响应
pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 PlacepinError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_placepin(err: &PlacepinError) -> HttpResponse {
    let status = err.http_status();
    let error_code = ErrorCode::from(err.clone());
    error_response(status, error_code, err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 PlacepinError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<PlacepinError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: PlacepinError = e.into();
            error_from_placepin(&err)
        }
    }
}

/// 构建分页响应
pub fn paginated_response<T: Serialize>(
    data: T,
    page: u64,
    page_size: u64,
    total: u64,
) -> HttpResponse {
    let total_pages = total.div_ceil(page_size.max(1));
    HttpResponse::Ok()
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(PaginatedResponse {
            code: ErrorCode::Success as i32,
            message: "OK".to_string(),
            data,
            pagination: PaginationInfo {
                page,
                page_size,
                total,
                total_pages,
            },
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_status() {
        let response = success_response("data");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_error_response_status() {
        let response = error_response(StatusCode::FORBIDDEN, ErrorCode::Forbidden, "nope");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_error_from_placepin_maps_status() {
        let err = PlacepinError::not_found("missing");
        assert_eq!(error_from_placepin(&err).status(), StatusCode::NOT_FOUND);

        let err = PlacepinError::forbidden("denied");
        assert_eq!(error_from_placepin(&err).status(), StatusCode::FORBIDDEN);

        let err = PlacepinError::validation("bad field");
        assert_eq!(error_from_placepin(&err).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_api_result_ok_and_err() {
        let ok: Result<&str, PlacepinError> = Ok("fine");
        assert_eq!(api_result(ok).status(), StatusCode::OK);

        let err: Result<&str, PlacepinError> = Err(PlacepinError::conflict("dup"));
        assert_eq!(api_result(err).status(), StatusCode::CONFLICT);
    }
}
