// Response interpreter: every decoded body passes through `interpret`
// before an adapter reads a single field from it.

use serde::Deserialize;
use serde_json::{Map, Number, Value};

use crate::error::{Error, ModerationServiceError, Result};

/// The `rsp` object of a successful call. Field shapes are operation
/// specific, so adapters pull what they need through `field`.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Text value of a payload field. The service sends string-typed
    /// values; bare JSON numbers are read as their decimal text.
    pub fn field(&self, name: &str) -> Result<String> {
        match self.0.get(name) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(Error::InvalidField {
                field: name.to_string(),
                value: other.to_string(),
            }),
            None => Err(Error::MissingField(name.to_string())),
        }
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Decoded form of `{"rsp": {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Error(ModerationServiceError),
    Success(Payload),
}

#[derive(Deserialize)]
struct ErrBody {
    #[serde(rename = "@attributes")]
    attributes: ErrAttributes,
}

#[derive(Deserialize)]
struct ErrAttributes {
    msg: String,
    code: ErrCode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrCode {
    Text(String),
    Number(Number),
}

impl ErrCode {
    fn into_text(self) -> String {
        match self {
            ErrCode::Text(s) => s,
            ErrCode::Number(n) => n.to_string(),
        }
    }
}

impl Envelope {
    pub fn decode(body: Value) -> Result<Self> {
        let Value::Object(mut outer) = body else {
            return Err(Error::Envelope("body is not a JSON object".into()));
        };
        let rsp = outer
            .remove("rsp")
            .ok_or_else(|| Error::Envelope("missing `rsp` key".into()))?;
        let Value::Object(rsp) = rsp else {
            return Err(Error::Envelope("`rsp` is not an object".into()));
        };

        match rsp.get("err") {
            Some(err) => {
                let body: ErrBody = serde_json::from_value(err.clone())
                    .map_err(|e| Error::Envelope(format!("unreadable `err` object: {e}")))?;
                Ok(Envelope::Error(ModerationServiceError {
                    message: body.attributes.msg,
                    code: body.attributes.code.into_text(),
                }))
            }
            None => Ok(Envelope::Success(Payload(rsp))),
        }
    }
}

/// Turn a decoded body into the success payload, or fail with the
/// service's own error.
pub fn interpret(body: Value) -> Result<Payload> {
    match Envelope::decode(body)? {
        Envelope::Error(err) => Err(Error::Service(err)),
        Envelope::Success(payload) => Ok(payload),
    }
}
