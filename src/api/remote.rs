//! Purpose: Provide an HTTP client for a remote sieve server.
//! Exports: `RemoteClient`.
//! Role: Mirrors the local sieve operation over the v0 JSON protocol.
//! Invariants: Error envelopes map back to the originating kind and message.
//! Invariants: The base URL carries scheme/host/port only; paths are fixed here.

use crate::api::{Enid, Gender, Metadata};
use crate::core::error::{Error, ErrorKind};
use serde::Deserialize;
use serde_json::json;
use url::Url;

type ApiResult<T> = Result<T, Error>;

#[derive(Clone, Debug)]
pub struct RemoteClient {
    base_url: Url,
    token: Option<String>,
    agent: ureq::Agent,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    kind: String,
    message: String,
    #[serde(default)]
    hint: Option<String>,
}

#[derive(Deserialize)]
struct WireMetadata {
    century_code: u8,
    century_span: String,
    birthdate: String,
    birthdate_unixtimestamp: i64,
    governorate: String,
    governorate_code: u8,
    gender: String,
    check_code: u8,
}

impl RemoteClient {
    pub fn new(base_url: impl AsRef<str>) -> ApiResult<Self> {
        let base_url = Url::parse(base_url.as_ref()).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message("invalid remote base URL")
                .with_source(err)
        })?;
        match base_url.scheme() {
            "http" | "https" => {}
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message("remote base URL must use http or https"));
            }
        }
        if !matches!(base_url.path(), "" | "/") {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("remote base URL must not carry a path")
                .with_hint("Use the server root, e.g. http://127.0.0.1:9714."));
        }
        Ok(Self {
            base_url,
            token: None,
            agent: ureq::AgentBuilder::new().build(),
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sends the identifier to the remote sieve endpoint and reconstructs the
    /// decoded metadata from the response payload.
    pub fn sieve(&self, enid: &Enid) -> ApiResult<Metadata> {
        let url = self.endpoint("v0/enids/sieve")?;
        let mut request = self.agent.post(url.as_str());
        if let Some(token) = &self.token {
            request = request.set("authorization", &format!("Bearer {token}"));
        }
        let response = match request.send_json(json!({ "enid": enid.as_str() })) {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => return Err(error_from_response(response)),
            Err(err) => {
                return Err(Error::new(ErrorKind::Io)
                    .with_message(format!("remote sieve request failed: {err}")));
            }
        };
        let wire: WireMetadata = response.into_json().map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to decode remote sieve response")
                .with_source(err)
        })?;
        metadata_from_wire(wire)
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url.join(path).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message("failed to resolve remote endpoint")
                .with_source(err)
        })
    }
}

fn metadata_from_wire(wire: WireMetadata) -> ApiResult<Metadata> {
    let gender = match wire.gender.as_str() {
        "female" => Gender::Female,
        "male" => Gender::Male,
        other => {
            return Err(Error::new(ErrorKind::Internal)
                .with_message(format!("unknown gender value in remote response: {other}")));
        }
    };
    Ok(Metadata {
        century_code: wire.century_code,
        century_span: wire.century_span,
        birthdate: wire.birthdate,
        birthdate_unixtimestamp: wire.birthdate_unixtimestamp,
        governorate: wire.governorate,
        governorate_code: wire.governorate_code,
        gender,
        check_code: wire.check_code,
    })
}

fn error_from_response(response: ureq::Response) -> Error {
    let status = response.status();
    match response.into_json::<ErrorEnvelope>() {
        Ok(envelope) => {
            let mut err = Error::new(error_kind_from_wire(&envelope.error.kind))
                .with_message(envelope.error.message);
            if let Some(hint) = envelope.error.hint {
                err = err.with_hint(hint);
            }
            err
        }
        Err(_) => Error::new(ErrorKind::Io)
            .with_message(format!("remote sieve server returned status {status}")),
    }
}

fn error_kind_from_wire(kind: &str) -> ErrorKind {
    match kind {
        "Usage" => ErrorKind::Usage,
        "Format" => ErrorKind::Format,
        "Century" => ErrorKind::Century,
        "BirthDate" => ErrorKind::BirthDate,
        "Governorate" => ErrorKind::Governorate,
        "Decode" => ErrorKind::Decode,
        "Permission" => ErrorKind::Permission,
        "Io" => ErrorKind::Io,
        _ => ErrorKind::Internal,
    }
}
