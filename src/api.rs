// API client module: a small blocking HTTP client for the WebPurify
// text and image moderation services. Every remote operation is a
// method on `WebPurifyClient` that goes through `dispatch`.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::envelope::{interpret, Payload};
use crate::error::{Error, Result};

pub const TEXT_API_URL: &str = "http://api1.webpurify.com/services/rest/";
pub const IMAGE_API_URL: &str = "http://im-api1.webpurify.com/services/rest/";

/// Remote method identifiers.
pub mod method {
    pub const CHECK: &str = "webpurify.live.check";
    pub const REPLACE: &str = "webpurify.live.replace";
    pub const IMAGE_CHECK: &str = "webpurify.live.imgcheck";
    pub const IMAGE_STATUS: &str = "webpurify.live.imgstatus";
    pub const NUDITY_CHECK: &str = "webpurify.aim.imgcheck";
    pub const ADD_TO_BLACKLIST: &str = "webpurify.live.addtoblacklist";
    pub const REMOVE_FROM_BLACKLIST: &str = "webpurify.live.removefromblacklist";
    pub const ADD_TO_WHITELIST: &str = "webpurify.live.addtowhitelist";
    pub const REMOVE_FROM_WHITELIST: &str = "webpurify.live.removefromwhitelist";

    /// Sandbox variants skip real moderation; use them in pairs.
    pub const SANDBOX_IMAGE_CHECK: &str = "webpurify.sandbox.imgcheck";
    pub const SANDBOX_IMAGE_STATUS: &str = "webpurify.sandbox.imgstatus";
}

/// Base URLs of the two services. `Default` points at production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub text: String,
    pub image: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            text: TEXT_API_URL.into(),
            image: IMAGE_API_URL.into(),
        }
    }
}

/// Review state of a submitted image. Unknown states are passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStatus {
    Pending,
    Approved,
    Declined,
    Other(String),
}

impl From<String> for ImageStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => ImageStatus::Pending,
            "approved" => ImageStatus::Approved,
            "declined" => ImageStatus::Declined,
            _ => ImageStatus::Other(value),
        }
    }
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageStatus::Pending => f.write_str("pending"),
            ImageStatus::Approved => f.write_str("approved"),
            ImageStatus::Declined => f.write_str("declined"),
            ImageStatus::Other(s) => f.write_str(s),
        }
    }
}

/// Merge the fixed request envelope over the operation parameters.
/// `method`, `api_key` and `format` always win on a key clash.
pub fn build_form(method: &str, api_key: &str, params: &[(&str, &str)]) -> BTreeMap<String, String> {
    let mut form: BTreeMap<String, String> = params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    form.insert("method".into(), method.into());
    form.insert("api_key".into(), api_key.into());
    form.insert("format".into(), "json".into());
    form
}

/// The service answers string booleans; only "1" counts as set.
fn is_set(flag: &str) -> bool {
    flag == "1"
}

/// The replace call reports `found` as text and it is compared as text:
/// anything ordering after "0" selects the service's rewritten string.
// TODO: ask WebPurify whether `found` is always a non-negative count; if so
// this can become a numeric nonzero check ("-1" and "00" differ today).
fn found_any(found: &str) -> bool {
    found > "0"
}

/// Holds the blocking reqwest client, the service endpoints and the
/// API key for a single invocation.
#[derive(Clone)]
pub struct WebPurifyClient {
    client: Client,
    endpoints: Endpoints,
    api_key: String,
}

impl WebPurifyClient {
    /// Client against the production endpoints.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_endpoints(api_key, Endpoints::default())
    }

    pub fn with_endpoints(api_key: impl Into<String>, endpoints: Endpoints) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(WebPurifyClient {
            client,
            endpoints,
            api_key: api_key.into(),
        })
    }

    /// POST one form-encoded request and interpret the envelope.
    /// Non-2xx statuses and unreadable bodies are returned as errors.
    pub fn dispatch(&self, base_url: &str, method: &str, params: &[(&str, &str)]) -> Result<Payload> {
        let form = build_form(method, &self.api_key, params);
        debug!(method, url = base_url, "sending request");

        let res = self.client.post(base_url).form(&form).send()?;
        debug!(status = %res.status(), method, "response received");
        let res = res.error_for_status()?;

        let text = res.text()?;
        let body: Value = serde_json::from_str(&text)?;
        interpret(body)
    }

    fn text_call(&self, method: &str, params: &[(&str, &str)]) -> Result<Payload> {
        self.dispatch(&self.endpoints.text, method, params)
    }

    fn image_call(&self, method: &str, params: &[(&str, &str)]) -> Result<Payload> {
        self.dispatch(&self.endpoints.image, method, params)
    }

    /// Whether `text` contains profanity. The number of hits is not reported.
    pub fn check_text(&self, text: &str, lang: &str) -> Result<bool> {
        let rsp = self.text_call(method::CHECK, &[("text", text), ("lang", lang)])?;
        Ok(is_set(&rsp.field("found")?))
    }

    /// Text with profanity masked by `replace_symbol`, or `text` itself
    /// when nothing was found.
    pub fn replace_text(&self, text: &str, lang: &str, replace_symbol: &str) -> Result<String> {
        let rsp = self.text_call(
            method::REPLACE,
            &[("text", text), ("lang", lang), ("replacesymbol", replace_symbol)],
        )?;
        if found_any(&rsp.field("found")?) {
            rsp.field("text")
        } else {
            Ok(text.to_string())
        }
    }

    /// Submit an image for review; returns the id to poll with
    /// `image_status`.
    pub fn submit_image(&self, image_url: &str) -> Result<String> {
        self.submit_image_with_method(image_url, method::IMAGE_CHECK)
    }

    pub fn submit_image_with_method(&self, image_url: &str, method: &str) -> Result<String> {
        let rsp = self.image_call(method, &[("imgurl", image_url)])?;
        rsp.field("imgid")
    }

    /// Nudity score of an image as a percentage.
    pub fn check_nudity(&self, image_url: &str) -> Result<f64> {
        self.check_nudity_with_method(image_url, method::NUDITY_CHECK)
    }

    pub fn check_nudity_with_method(&self, image_url: &str, method: &str) -> Result<f64> {
        let rsp = self.image_call(method, &[("imgurl", image_url)])?;
        let nudity = rsp.field("nudity")?;
        nudity.trim().parse::<f64>().map_err(|_| Error::InvalidField {
            field: "nudity".into(),
            value: nudity,
        })
    }

    /// Review status of a previously submitted image. Poll with the
    /// sandbox method if the image was submitted through the sandbox.
    pub fn image_status(&self, image_id: &str) -> Result<ImageStatus> {
        self.image_status_with_method(image_id, method::IMAGE_STATUS)
    }

    pub fn image_status_with_method(&self, image_id: &str, method: &str) -> Result<ImageStatus> {
        let rsp = self.image_call(method, &[("imgid", image_id)])?;
        Ok(ImageStatus::from(rsp.field("status")?))
    }

    pub fn add_to_blacklist(&self, word: &str) -> Result<bool> {
        self.word_list_call(method::ADD_TO_BLACKLIST, word)
    }

    pub fn remove_from_blacklist(&self, word: &str) -> Result<bool> {
        self.word_list_call(method::REMOVE_FROM_BLACKLIST, word)
    }

    pub fn add_to_whitelist(&self, word: &str) -> Result<bool> {
        self.word_list_call(method::ADD_TO_WHITELIST, word)
    }

    pub fn remove_from_whitelist(&self, word: &str) -> Result<bool> {
        self.word_list_call(method::REMOVE_FROM_WHITELIST, word)
    }

    fn word_list_call(&self, method: &str, word: &str) -> Result<bool> {
        let rsp = self.text_call(method, &[("word", word)])?;
        Ok(is_set(&rsp.field("success")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_keys_win_over_params() {
        let form = build_form(
            method::CHECK,
            "secret",
            &[("method", "evil"), ("api_key", "other"), ("format", "xml"), ("text", "hi")],
        );
        assert_eq!(form["method"], method::CHECK);
        assert_eq!(form["api_key"], "secret");
        assert_eq!(form["format"], "json");
        assert_eq!(form["text"], "hi");
        assert_eq!(form.len(), 4);
    }

    #[test]
    fn envelope_keys_present_with_no_params() {
        let form = build_form(method::IMAGE_STATUS, "k", &[]);
        assert_eq!(form.len(), 3);
        assert_eq!(form["method"], "webpurify.live.imgstatus");
    }

    #[test]
    fn only_one_counts_as_set() {
        assert!(is_set("1"));
        assert!(!is_set("0"));
        assert!(!is_set("2"));
        assert!(!is_set(""));
    }

    // found is compared as a string, so "10" and "9" both count as hits
    // while "", "00" and "-1" do not.
    #[test]
    fn replace_uses_string_ordering_on_found() {
        assert!(found_any("1"));
        assert!(found_any("9"));
        assert!(found_any("10"));
        assert!(found_any("a"));
        assert!(!found_any("0"));
        assert!(!found_any(""));
        assert!(!found_any("-1"));
        assert!(found_any("00"));
    }

    #[test]
    fn image_status_known_and_passthrough() {
        assert_eq!(ImageStatus::from("pending".to_string()), ImageStatus::Pending);
        assert_eq!(ImageStatus::from("approved".to_string()), ImageStatus::Approved);
        assert_eq!(ImageStatus::from("declined".to_string()), ImageStatus::Declined);
        let other = ImageStatus::from("Queued".to_string());
        assert_eq!(other, ImageStatus::Other("Queued".into()));
        assert_eq!(other.to_string(), "Queued");
        assert_eq!(ImageStatus::Approved.to_string(), "approved");
    }

    #[test]
    fn default_endpoints_are_production_hosts() {
        let client = WebPurifyClient::new("k").unwrap();
        assert_eq!(client.endpoints, Endpoints::default());
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.text, "http://api1.webpurify.com/services/rest/");
        assert_eq!(endpoints.image, "http://im-api1.webpurify.com/services/rest/");
    }
}
