use std::fmt;

/// Failure while talking to the remote endpoint:
/// connection, timeout or a non-2xx status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError
{   pub message: String
  , /// HTTP status, when the server answered
    pub status: Option<u16>
  , pub timed_out: bool
}

/// Response body was not valid JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError
{   pub message: String
  , pub line: usize
  , pub column: usize
}

/// Error type for a single node call.
/// Implements Clone so outcomes can be compared and copied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Network, timeout or HTTP status error
    Transport(TransportError)
  , /// Response body could not be decoded as JSON
    Decode(DecodeError)
  , /// Response decoded but had an unexpected shape
    Unexpected(String)
  , /// Node inputs failed validation
    InvalidInput(String)
}

impl Error
{   /// Detail message without the category prefix
    pub fn message(&self) -> &str
    {   match self
        {   Error::Transport(e) => &e.message
          , Error::Decode(e) => &e.message
          , Error::Unexpected(msg) => msg
          , Error::InvalidInput(msg) => msg
        }
    }

    pub fn is_timeout(&self) -> bool
    {   matches!(
          self,
          Error::Transport(TransportError { timed_out: true, .. })
        )
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::Transport(e) => {
              write!(f, "API Request Error: {}", e.message)
            }
          , Error::Decode(e) => {
              write!(f, "JSON Parse Error: {}", e.message)
            }
          , Error::Unexpected(msg) => {
              write!(f, "Unexpected Error: {}", msg)
            }
          , Error::InvalidInput(msg) => {
              write!(f, "Invalid Input: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error
{   fn from(e: reqwest::Error) -> Self
    {   Error::Transport(TransportError
        {   message: e.to_string()
          , status: e.status().map(|s| s.as_u16())
          , timed_out: e.is_timeout()
        })
    }
}

impl From<serde_json::Error> for Error
{   fn from(e: serde_json::Error) -> Self
    {   Error::Decode(DecodeError
        {   message: e.to_string()
          , line: e.line()
          , column: e.column()
        })
    }
}
