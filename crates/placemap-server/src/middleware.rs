use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied id that is echoed back; longer ones are replaced.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Correlation id for one request, available to handlers as an extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Tags every request with a [`RequestId`] and echoes it on the response.
///
/// A usable `x-request-id` from the client is kept; anything missing,
/// blank or oversized gets a fresh UUIDv4.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = client_request_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    match HeaderValue::from_str(&id) {
        Ok(value) => {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(e) => tracing::debug!(error = %e, "request id not representable as a header"),
    }
    res
}

fn client_request_id(req: &Request) -> Option<String> {
    let raw = req.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    (!raw.is_empty() && raw.len() <= MAX_REQUEST_ID_LEN).then(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(id: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/");
        if let Some(id) = id {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn keeps_client_id() {
        assert_eq!(client_request_id(&request(Some(" abc-1 "))).as_deref(), Some("abc-1"));
    }

    #[test]
    fn rejects_blank_and_oversized_ids() {
        assert_eq!(client_request_id(&request(None)), None);
        assert_eq!(client_request_id(&request(Some("   "))), None);
        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        assert_eq!(client_request_id(&request(Some(&long))), None);
    }
}
