//
// etherpad-client error.rs
// Distributed under terms of the GNU GPLv3 license.
//

use std::fmt;

/// A `Result` alias where the `Err` case is `etherpad_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub(crate) enum Kind {
    Reqwest,
    UrlParse,
    Json,
    InvalidParameters,
    InternalError,
    NotSupported,
    AuthFailure,
    Api
}

pub struct Error {
    kind: Kind,
    message: String,
    code: Option<i64>,
    status: Option<reqwest::StatusCode>
}

impl Error {
     /// Builds an API-level error from the envelope code and message
     pub(crate) fn api(code: i64, message: impl Into<String>) -> Error {
         let kind = match code {
             1 => Kind::InvalidParameters,
             2 => Kind::InternalError,
             3 => Kind::NotSupported,
             4 => Kind::AuthFailure,
             _ => Kind::Api
         };
         Error {
             kind,
             message: message.into(),
             code: Some(code),
             status: None
         }
     }

     /// Returns true if the error is from Reqwest
     pub fn is_reqwest(&self) -> bool {
         matches!(self.kind, Kind::Reqwest)
     }

     /// Returns true if the error is from UrlParse
     pub fn is_url_parse(&self) -> bool {
         matches!(self.kind, Kind::UrlParse)
     }

     /// Returns true if the error is from a JSON parse or decode failure
     pub fn is_json(&self) -> bool {
         matches!(self.kind, Kind::Json)
     }

     /// Returns true if the error comes from a nonzero envelope code
     pub fn is_api(&self) -> bool {
         self.code.is_some()
     }

     /// Returns true if the server reported wrong parameters (code 1)
     pub fn is_invalid_parameters(&self) -> bool {
         matches!(self.kind, Kind::InvalidParameters)
     }

     /// Returns true if the server reported an internal error (code 2)
     pub fn is_internal_error(&self) -> bool {
         matches!(self.kind, Kind::InternalError)
     }

     /// Returns true if the server does not support the operation (code 3)
     pub fn is_not_supported(&self) -> bool {
         matches!(self.kind, Kind::NotSupported)
     }

     /// Returns true if the server rejected the API key (code 4)
     pub fn is_auth_failure(&self) -> bool {
         matches!(self.kind, Kind::AuthFailure)
     }

     /// Returns message as is
     pub fn message(&self) -> String {
         self.message.clone()
     }

     /// Returns the envelope code for API errors
     pub fn code(&self) -> Option<i64> {
         self.code
     }

     /// Returns the status code as u16
     pub fn status(&self) -> Option<u16> {
         self.status.map(|e| e.as_u16())
     }

     /// Returns the status code as is
     pub fn status_code(&self) -> Option<reqwest::StatusCode> {
         self.status
     }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            Kind::Reqwest => f.write_str("reqwest error")?,
            Kind::UrlParse => f.write_str("URL parse error")?,
            Kind::Json => f.write_str("JSON error")?,
            Kind::InvalidParameters => f.write_str("invalid parameters")?,
            Kind::InternalError => f.write_str("internal server error")?,
            Kind::NotSupported => f.write_str("operation not supported")?,
            Kind::AuthFailure => f.write_str("authentication failure")?,
            Kind::Api => f.write_str("API error")?,
        };
        write!(f, ", {}", self.message)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Error {{ kind: {:?}, message: {}, code: {:?}, status: {:?} }}",
            self.kind, self.message, self.code, self.status
        )
    }
}

// Implement std::convert::From for Error from reqwest::Error
impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error {
            kind: Kind::Reqwest,
            message: error.to_string(),
            code: None,
            status: error.status()
        }
    }
}

// Implement std::convert::From for Error from url::ParseError
impl From<url::ParseError> for Error {
    fn from(error: url::ParseError) -> Self {
        Error {
            kind: Kind::UrlParse,
            message: error.to_string(),
            code: None,
            status: None
        }
    }
}

// Implement std::convert::From for Error from serde_json::Error
impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error {
            kind: Kind::Json,
            message: error.to_string(),
            code: None,
            status: None
        }
    }
}
