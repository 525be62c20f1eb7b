use hyper::Request;
use hyper::header::HeaderMap;
use tracing::debug;

/// Extract a header value as a string
pub fn get_header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(|s| {
        debug!("Retrieved header: {}", name);
        s.to_string()
    })
}

/// Extract bearer token from Authorization header
/// Format: "Authorization: Bearer <token>"
///
/// Returns `None` both when the header is absent and when its scheme is not
/// `Bearer` — the router treats either case as an unauthenticated request.
pub fn get_bearer_token<B>(req: &Request<B>) -> Option<String> {
    get_header_value(req.headers(), "authorization").and_then(|auth| {
        auth.strip_prefix("Bearer ").map(|token| {
            debug!("Bearer token extracted");
            token.to_string()
        })
    })
}

/// Check if the request declares a JSON body.
pub fn is_json_request<B>(req: &Request<B>) -> bool {
    get_header_value(req.headers(), "content-type")
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req_with_auth(value: Option<&str>) -> Request<()> {
        let mut builder = Request::builder().uri("/auth/me");
        if let Some(v) = value {
            builder = builder.header("authorization", v);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn bearer_token_extracted() {
        let req = req_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(get_bearer_token(&req).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_header_yields_none() {
        let req = req_with_auth(None);
        assert!(get_bearer_token(&req).is_none());
    }

    #[test]
    fn non_bearer_scheme_yields_none() {
        let req = req_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert!(get_bearer_token(&req).is_none());
    }

    #[test]
    fn empty_bearer_value_is_empty_string() {
        // "Bearer " with nothing after it — extraction succeeds, token
        // verification downstream will reject it as malformed.
        let req = req_with_auth(Some("Bearer "));
        assert_eq!(get_bearer_token(&req).as_deref(), Some(""));
    }

    #[test]
    fn json_content_type_detected() {
        let req = Request::builder()
            .header("content-type", "application/json; charset=utf-8")
            .body(())
            .unwrap();
        assert!(is_json_request(&req));
    }
}
