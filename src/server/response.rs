use may_minihttp::Response;

use crate::dispatcher::{HandlerResponse, ResponseBody};

pub fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        408 => "Request Timeout",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// Write `response` onto the wire. The content type follows the body kind
/// unless a `Content-Type` header was set explicitly.
pub fn write_response(res: &mut Response, response: HandlerResponse) {
    res.status_code(response.status as usize, status_reason(response.status));

    let explicit_content_type = response
        .headers
        .keys()
        .any(|k| k.eq_ignore_ascii_case("content-type"));
    for (name, value) in &response.headers {
        res.header(Box::leak(format!("{name}: {value}").into_boxed_str()));
    }

    match response.body {
        ResponseBody::Text(text) => {
            if !explicit_content_type {
                res.header("Content-Type: text/plain");
            }
            res.body_vec(text.into_bytes());
        }
        ResponseBody::Json(value) => {
            if !explicit_content_type {
                res.header("Content-Type: application/json");
            }
            res.body_vec(serde_json::to_vec(&value).unwrap_or_default());
        }
        ResponseBody::Html(html) => {
            if !explicit_content_type {
                res.header("Content-Type: text/html");
            }
            res.body_vec(html.into_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(413), "Payload Too Large");
    }
}
