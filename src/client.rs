use std::time::Duration;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Map, Value};
use log::{debug, trace, error};

use crate::config::{NodeConfig, RequestParameters};
use crate::error::Error;
use crate::request::{CallOutcome, ChatCompletionRequest, NO_RESPONSE_TEXT};

/// The LLM API call node.
///
/// Holds no per-call state: every call builds its own HTTP
/// client, sends one request and is done, so a single node
/// can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct ChatCompletionNode
{   config: NodeConfig
}

impl ChatCompletionNode
{   /// Create a node with the default 60 second timeout
    pub fn new() -> Self
    {   debug!("Creating ChatCompletionNode");
        ChatCompletionNode::with_config(NodeConfig::default())
    }

    pub fn with_config(config: NodeConfig) -> Self
    {   debug!(
          "ChatCompletionNode timeout: {}s",
          config.timeout_secs
        );
        ChatCompletionNode { config }
    }

    pub fn config(&self) -> &NodeConfig
    {   &self.config
    }

    /// Call the endpoint. Never fails: errors are rendered
    /// into the outcome's two strings.
    pub async fn call(&self, params: &RequestParameters)
      -> CallOutcome
    {   self.try_call(params).await.into()
    }

    /// Same as `call`, but with the error kept typed
    pub async fn try_call(&self, params: &RequestParameters)
      -> Result<CallOutcome, Error>
    {   debug!(
          "Sending chat completion for model: {}",
          params.model()
        );

        let http_client = self.http_client()?;
        let request = ChatCompletionRequest::from(params);
        trace!("Chat completion request: {:?}", request);

        let response = http_client
          .post(params.api_url())
          .header(CONTENT_TYPE, "application/json")
          .header(
            AUTHORIZATION,
            format!("Bearer {}", params.api_token())
          )
          .json(&request)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            Error::from(e)
          })?;

        let status = response.status();
        trace!("Chat completion response status: {}", status);

        let response = response.error_for_status()
          .map_err(|e| {
            error!("API returned status {}: {}", status, e);
            Error::from(e)
          })?;

        let body = response.text().await.map_err(|e| {
          error!("Failed to read response body: {}", e);
          Error::from(e)
        })?;

        interpret_body(&body)
    }

    /// Blocking variant for hosts that call from a plain
    /// thread. Runs the request on a private current-thread
    /// runtime, so it must not be called from a thread that
    /// is already driving a tokio runtime; doing so yields an
    /// error outcome.
    pub fn call_blocking(&self, params: &RequestParameters)
      -> CallOutcome
    {   if tokio::runtime::Handle::try_current().is_ok()
        {   error!("call_blocking invoked inside a tokio runtime");
            return CallOutcome::from_error(&Error::Unexpected(
              "call_blocking cannot run inside an async runtime"
                .to_string()
            ));
        }

        match tokio::runtime::Builder::new_current_thread()
          .enable_all()
          .build()
        {   Ok(runtime) => runtime.block_on(self.call(params))
          , Err(e) => {
              error!("Failed to start runtime: {}", e);
              CallOutcome::from_error(&Error::Unexpected(
                format!("failed to start runtime: {}", e)
              ))
            }
        }
    }

    /// Host boundary: raw inputs keyed by input name
    pub async fn execute(&self, inputs: &Map<String, Value>)
      -> CallOutcome
    {   match RequestParameters::from_inputs(inputs)
        {   Ok(params) => self.call(&params).await
          , Err(e) => CallOutcome::from_error(&e)
        }
    }

    pub fn execute_blocking(&self, inputs: &Map<String, Value>)
      -> CallOutcome
    {   match RequestParameters::from_inputs(inputs)
        {   Ok(params) => self.call_blocking(&params)
          , Err(e) => CallOutcome::from_error(&e)
        }
    }

    fn http_client(&self) -> Result<reqwest::Client, Error>
    {   let mut builder = reqwest::Client::builder()
          .timeout(Duration::from_secs(self.config.timeout_secs));
        if let Some(agent) = &self.config.user_agent
        {   builder = builder.user_agent(agent.clone());
        }
        builder.build().map_err(|e| {
          error!("Failed to build HTTP client: {}", e);
          Error::from(e)
        })
    }
}

/// Turn a successful response body into the node outcome.
///
/// The full body is echoed pretty-printed with its keys in
/// their original order.
pub fn interpret_body(body: &str) -> Result<CallOutcome, Error>
{   let value: Value = serde_json::from_str(body).map_err(|e| {
      error!("Parse error: {}", e);
      Error::from(e)
    })?;

    let response_text = extract_content(&value)?;

    let full_json = serde_json::to_string_pretty(&value)
      .map_err(|e| Error::Unexpected(e.to_string()))?;

    Ok(CallOutcome::success(response_text, full_json))
}

/// `choices[0].message.content`, or the placeholder text
/// when there are no choices
pub fn extract_content(value: &Value) -> Result<String, Error>
{   let choices = match value.get("choices")
    {   None | Some(Value::Null) => {
          debug!("No choices in response");
          return Ok(NO_RESPONSE_TEXT.to_string());
        }
      , Some(Value::Array(choices)) => choices
      , Some(other) => {
          error!("choices is not an array: {}", other);
          return Err(Error::Unexpected(
            "'choices' is not an array".to_string()
          ));
        }
    };

    let first = match choices.first()
    {   Some(first) => first
      , None => {
          debug!("Empty choices in response");
          return Ok(NO_RESPONSE_TEXT.to_string());
        }
    };

    let content = first.get("message")
      .ok_or_else(|| missing("choices[0].message"))?
      .get("content")
      .ok_or_else(|| missing("choices[0].message.content"))?;

    // tool-call replies carry null content
    match content
    {   Value::String(text) => Ok(text.clone())
      , Value::Null => {
          debug!("Null content in first choice");
          Ok(String::new())
        }
      , other => Ok(other.to_string())
    }
}

fn missing(path: &str) -> Error
{   error!("Response is missing {}", path);
    Error::Unexpected(format!("missing '{}'", path))
}
