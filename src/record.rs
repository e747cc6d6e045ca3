//! The per-request snapshot and the log record built from it.
//!
//! # Why a snapshot?
//!
//! The inner service consumes the `http::Request` by value, but the log
//! record is built *after* it returns — and the skip predicate and custom
//! field producer both need to look at the request too. [`RequestInfo`]
//! captures the request line, headers, and peer address up front so the
//! request itself can move on untouched.

use std::net::SocketAddr;
use std::time::Duration;

use http::{HeaderMap, Method, Response, Uri};
use http_body::Body;

use crate::field::Field;

/// Header carrying the request correlation identifier.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The client socket address, inserted into request extensions by the host.
///
/// `http::Request` does not carry the peer address; servers that want it in
/// the access log insert this extension per connection:
///
/// ```rust,ignore
/// req.extensions_mut().insert(RemoteAddr(peer));
/// ```
///
/// Proxy headers (`x-forwarded-for`, `x-real-ip`) take precedence — behind a
/// reverse proxy the socket peer is the proxy, not the client.
#[derive(Debug, Clone, Copy)]
pub struct RemoteAddr(pub SocketAddr);

// ── RequestInfo ───────────────────────────────────────────────────────────────

/// Snapshot of an in-flight request, taken before it is handed to the
/// wrapped service.
///
/// This is the request context seen by [`SkipPredicate`](crate::SkipPredicate)
/// and [`FieldProducer`](crate::FieldProducer).
#[derive(Debug, Clone)]
pub struct RequestInfo {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    remote_addr: Option<SocketAddr>,
}

impl RequestInfo {
    pub(crate) fn from_request<B>(req: &http::Request<B>) -> Self {
        Self {
            method: req.method().clone(),
            uri: req.uri().clone(),
            headers: req.headers().clone(),
            remote_addr: req.extensions().get::<RemoteAddr>().map(|r| r.0),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header lookup as a string; `None` for absent or non-UTF-8 values.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The socket peer, when the host supplied a [`RemoteAddr`] extension.
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// Best guess at the real client IP.
    ///
    /// First `x-forwarded-for` entry, then `x-real-ip`, then the socket
    /// peer, then empty.
    pub fn remote_ip(&self) -> String {
        if let Some(forwarded) = self.header("x-forwarded-for") {
            if let Some(first) = forwarded.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_owned();
                }
            }
        }
        if let Some(real) = self.header("x-real-ip") {
            let real = real.trim();
            if !real.is_empty() {
                return real.to_owned();
            }
        }
        match self.remote_addr {
            Some(addr) => addr.ip().to_string(),
            None => String::new(),
        }
    }

    /// The request host: `Host` header, falling back to the URI authority.
    pub fn host(&self) -> String {
        if let Some(host) = self.header("host") {
            return host.to_owned();
        }
        self.uri.authority().map(|a| a.to_string()).unwrap_or_default()
    }

    /// The request line, `"METHOD uri"`.
    pub fn request_line(&self) -> String {
        format!("{} {}", self.method, self.uri)
    }

    pub fn user_agent(&self) -> String {
        self.header("user-agent").unwrap_or_default().to_owned()
    }
}

// ── Record ────────────────────────────────────────────────────────────────────

/// One access-log record. Built per request, handed to the
/// [`LogSink`](crate::LogSink), never retained.
#[derive(Debug, Clone)]
pub struct Record {
    remote_ip: String,
    latency: Duration,
    host: String,
    request: String,
    status: u16,
    size: u64,
    user_agent: String,
    request_id: String,
    custom: Vec<Field>,
}

impl Record {
    pub(crate) fn build<RB: Body>(
        info: &RequestInfo,
        response: &Response<RB>,
        latency: Duration,
    ) -> Self {
        // Correlation ID: inbound request header first, then the outbound
        // response header, then empty — always present as a field.
        let request_id = info
            .header(X_REQUEST_ID)
            .map(str::to_owned)
            .or_else(|| {
                response
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned)
            })
            .unwrap_or_default();

        let size = response
            .body()
            .size_hint()
            .exact()
            .or_else(|| {
                response
                    .headers()
                    .get(http::header::CONTENT_LENGTH)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
            })
            .unwrap_or(0);

        Self {
            remote_ip: info.remote_ip(),
            latency,
            host: info.host(),
            request: info.request_line(),
            status: response.status().as_u16(),
            size,
            user_agent: info.user_agent(),
            request_id,
            custom: Vec::new(),
        }
    }

    pub(crate) fn append_custom(&mut self, fields: Vec<Field>) {
        self.custom.extend(fields);
    }

    pub fn remote_ip(&self) -> &str {
        &self.remote_ip
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The request line, `"METHOD uri"`.
    pub fn request(&self) -> &str {
        &self.request
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response body size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The correlation identifier; empty when neither side carried one.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Custom fields in producer order.
    pub fn custom(&self) -> &[Field] {
        &self.custom
    }

    /// The full ordered field set: the eight fixed fields, then the custom
    /// fields in producer order.
    pub fn fields(&self) -> Vec<Field> {
        let mut fields = vec![
            Field::str("remote_ip", self.remote_ip.as_str()),
            Field::str("latency", format!("{:?}", self.latency)),
            Field::str("host", self.host.as_str()),
            Field::str("request", self.request.as_str()),
            Field::uint("status", u64::from(self.status)),
            Field::uint("size", self.size),
            Field::str("user_agent", self.user_agent.as_str()),
            Field::str("request_id", self.request_id.as_str()),
        ];
        fields.extend(self.custom.iter().cloned());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http_body_util::Full;

    fn info(req: http::Request<()>) -> RequestInfo {
        RequestInfo::from_request(&req)
    }

    fn response(status: u16) -> Response<Full<Bytes>> {
        Response::builder()
            .status(status)
            .body(Full::new(Bytes::from_static(b"hello")))
            .unwrap()
    }

    /// A body with no exact size hint, like a streaming response.
    struct Streaming;

    impl Body for Streaming {
        type Data = Bytes;
        type Error = std::convert::Infallible;

        fn poll_frame(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
            std::task::Poll::Ready(None)
        }
    }

    #[test]
    fn remote_ip_prefers_forwarded_for() {
        let req = http::Request::builder()
            .uri("/")
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .header("x-real-ip", "198.51.100.2")
            .body(())
            .unwrap();
        assert_eq!(info(req).remote_ip(), "203.0.113.7");
    }

    #[test]
    fn remote_ip_falls_back_to_real_ip_then_socket() {
        let req = http::Request::builder()
            .uri("/")
            .header("x-real-ip", "198.51.100.2")
            .body(())
            .unwrap();
        assert_eq!(info(req).remote_ip(), "198.51.100.2");

        let mut req = http::Request::builder().uri("/").body(()).unwrap();
        req.extensions_mut()
            .insert(RemoteAddr("192.0.2.9:4711".parse().unwrap()));
        assert_eq!(info(req).remote_ip(), "192.0.2.9");

        let req = http::Request::builder().uri("/").body(()).unwrap();
        assert_eq!(info(req).remote_ip(), "");
    }

    #[test]
    fn empty_real_ip_header_is_treated_as_absent() {
        let mut req = http::Request::builder()
            .uri("/")
            .header("x-real-ip", "")
            .body(())
            .unwrap();
        req.extensions_mut()
            .insert(RemoteAddr("192.0.2.9:4711".parse().unwrap()));
        assert_eq!(info(req).remote_ip(), "192.0.2.9");
    }

    #[test]
    fn size_falls_back_to_content_length_for_streaming_bodies() {
        let req = http::Request::builder().uri("/").body(()).unwrap();
        let res = Response::builder()
            .status(200)
            .header("content-length", "2048")
            .body(Streaming)
            .unwrap();
        assert_eq!(Record::build(&info(req), &res, Duration::ZERO).size(), 2048);
    }

    #[test]
    fn size_is_zero_without_hint_or_content_length() {
        let req = http::Request::builder().uri("/").body(()).unwrap();
        let res = Response::builder().status(200).body(Streaming).unwrap();
        assert_eq!(Record::build(&info(req), &res, Duration::ZERO).size(), 0);
    }

    #[test]
    fn request_id_prefers_request_header() {
        let req = http::Request::builder()
            .uri("/")
            .header(X_REQUEST_ID, "from-request")
            .body(())
            .unwrap();
        let mut res = response(200);
        res.headers_mut()
            .insert(X_REQUEST_ID, "from-response".parse().unwrap());

        let record = Record::build(&info(req), &res, Duration::ZERO);
        assert_eq!(record.request_id(), "from-request");
    }

    #[test]
    fn request_id_falls_back_to_response_then_empty() {
        let req = http::Request::builder().uri("/").body(()).unwrap();
        let mut res = response(200);
        res.headers_mut()
            .insert(X_REQUEST_ID, "from-response".parse().unwrap());
        let record = Record::build(&info(req), &res, Duration::ZERO);
        assert_eq!(record.request_id(), "from-response");

        let req = http::Request::builder().uri("/").body(()).unwrap();
        let record = Record::build(&info(req), &response(200), Duration::ZERO);
        assert_eq!(record.request_id(), "");
    }

    #[test]
    fn host_prefers_header_over_uri_authority() {
        let req = http::Request::builder()
            .uri("http://upstream.internal/users")
            .header("host", "api.example.com")
            .body(())
            .unwrap();
        assert_eq!(info(req).host(), "api.example.com");

        let req = http::Request::builder()
            .uri("http://upstream.internal/users")
            .body(())
            .unwrap();
        assert_eq!(info(req).host(), "upstream.internal");
    }

    #[test]
    fn record_captures_request_line_status_and_size() {
        let req = http::Request::builder()
            .method("POST")
            .uri("/users?page=2")
            .header("user-agent", "curl/8.5")
            .body(())
            .unwrap();
        let record = Record::build(&info(req), &response(201), Duration::from_millis(3));

        assert_eq!(record.request(), "POST /users?page=2");
        assert_eq!(record.status(), 201);
        assert_eq!(record.size(), 5);
        assert_eq!(record.user_agent(), "curl/8.5");
    }

    #[test]
    fn fields_are_ordered_with_custom_at_the_tail() {
        let req = http::Request::builder().uri("/").body(()).unwrap();
        let mut record = Record::build(&info(req), &response(200), Duration::ZERO);
        record.append_custom(vec![Field::str("tenant", "acme"), Field::uint("shard", 3)]);

        let fields = record.fields();
        let keys: Vec<&str> = fields.iter().map(|f| f.key()).collect();
        assert_eq!(
            keys,
            [
                "remote_ip", "latency", "host", "request", "status", "size",
                "user_agent", "request_id", "tenant", "shard",
            ]
        );
    }
}
