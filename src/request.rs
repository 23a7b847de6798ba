//! Wire types for the chat-completion request and the
//! node's two-string outcome

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NO_RESPONSE_TEXT: &str = "No response generated";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

impl ChatMessage
{   pub fn system(content: impl Into<String>) -> Self
    {   ChatMessage
        {   role: "system".to_string()
          , content: content.into()
        }
    }

    pub fn user(content: impl Into<String>) -> Self
    {   ChatMessage
        {   role: "user".to_string()
          , content: content.into()
        }
    }
}

/// OpenAI-compatible chat-completion body.
/// Field order is the order keys are written on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , pub temperature: f64
  , pub max_tokens: u32
}

impl From<&crate::config::RequestParameters> for ChatCompletionRequest
{   fn from(params: &crate::config::RequestParameters) -> Self
    {   ChatCompletionRequest
        {   model: params.model().to_string()
          , messages: vec![
              ChatMessage::system(params.system_prompt())
            , ChatMessage::user(params.prompt())
            ]
          , temperature: params.temperature()
          , max_tokens: params.max_tokens()
        }
    }
}

/// What the node hands back to the host:
/// (response, full_json), in that order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOutcome
{   /// Assistant text, or a readable error message
    pub response: String
  , /// Pretty-printed response body, or {"error": ...}
    pub full_json: String
}

impl CallOutcome
{   pub fn success(
      response: impl Into<String>
    , full_json: impl Into<String>
    ) -> Self
    {   CallOutcome
        {   response: response.into()
          , full_json: full_json.into()
        }
    }

    /// Render an error into both output slots
    pub fn from_error(err: &crate::error::Error) -> Self
    {   let message = err.to_string();
        let full_json = format!(
          "{{\"error\": {}}}"
        , Value::String(message.clone())
        );
        CallOutcome
        {   response: message
          , full_json
        }
    }

    pub fn into_tuple(self) -> (String, String)
    {   (self.response, self.full_json)
    }
}

impl From<Result<CallOutcome, crate::error::Error>> for CallOutcome
{   fn from(result: Result<CallOutcome, crate::error::Error>) -> Self
    {   match result
        {   Ok(outcome) => outcome
          , Err(e) => CallOutcome::from_error(&e)
        }
    }
}
