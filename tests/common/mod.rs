// Shared helpers for the integration tests: a local mockito server
// standing in for both WebPurify hosts.

use mockito::{Matcher, Mock, ServerGuard};
use webpurify_cli::Endpoints;

pub const TEXT_PATH: &str = "/services/rest/";
pub const IMAGE_PATH: &str = "/image/services/rest/";

pub fn endpoints(server: &ServerGuard) -> Endpoints {
    Endpoints {
        text: format!("{}{}", server.url(), TEXT_PATH),
        image: format!("{}{}", server.url(), IMAGE_PATH),
    }
}

/// Mock one POST to `path` whose form carries `method`, the test key and
/// every pair in `params`, answering with `body`.
pub fn mock_call(
    server: &mut ServerGuard,
    path: &str,
    method: &str,
    params: &[(&str, &str)],
    body: &str,
) -> Mock {
    let mut matchers = vec![
        Matcher::UrlEncoded("method".into(), method.into()),
        Matcher::UrlEncoded("api_key".into(), "test-key".into()),
        Matcher::UrlEncoded("format".into(), "json".into()),
    ];
    matchers.extend(
        params
            .iter()
            .map(|(k, v)| Matcher::UrlEncoded(k.to_string(), v.to_string())),
    );
    server
        .mock("POST", path)
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(matchers))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}
