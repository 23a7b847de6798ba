//! Configuration for the LLM node: per-call request
//! parameters and the node's transport settings

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use log::{debug, error};

use crate::error::Error;

pub const DEFAULT_API_URL: &str
  = "https://api.deepseek.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_PROMPT: &str = "Hello, how are you?";
pub const DEFAULT_SYSTEM_PROMPT: &str
  = "You are a helpful assistant.";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const MIN_TEMPERATURE: f64 = 0.0;
pub const MAX_TEMPERATURE: f64 = 2.0;
pub const MIN_MAX_TOKENS: u32 = 1;
pub const MAX_MAX_TOKENS: u32 = 32000;

/// Validated inputs for one chat-completion call.
///
/// Ranges are checked on construction, so a value of this
/// type always describes a request the node is willing to send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRequestParameters")]
pub struct RequestParameters
{   api_url: String
  , api_token: String
  , model: String
  , prompt: String
  , system_prompt: String
  , temperature: f64
  , max_tokens: u32
}

/// Unchecked mirror used as the deserialization target
#[derive(Debug, Clone, Deserialize)]
struct RawRequestParameters
{   api_url: String
  , #[serde(default)]
    api_token: String
  , model: String
  , prompt: String
  , #[serde(default = "default_system_prompt")]
    system_prompt: String
  , temperature: f64
  , max_tokens: u32
}

fn default_system_prompt() -> String
{   DEFAULT_SYSTEM_PROMPT.to_string()
}

impl TryFrom<RawRequestParameters> for RequestParameters
{   type Error = Error;

    fn try_from(raw: RawRequestParameters)
      -> Result<Self, Self::Error>
    {   RequestParameters::new(
          raw.api_url
        , raw.api_token
        , raw.model
        , raw.prompt
        , raw.temperature
        , raw.max_tokens
        )
        .map(|p| p.with_system_prompt(raw.system_prompt))
    }
}

impl RequestParameters
{   /// Create request parameters, rejecting out-of-range
    /// temperature or token budget
    pub fn new(
      api_url: impl Into<String>
    , api_token: impl Into<String>
    , model: impl Into<String>
    , prompt: impl Into<String>
    , temperature: f64
    , max_tokens: u32
    ) -> Result<Self, Error>
    {   validate_temperature(temperature)?;
        validate_max_tokens(max_tokens)?;
        Ok(RequestParameters
        {   api_url: api_url.into()
          , api_token: api_token.into()
          , model: model.into()
          , prompt: prompt.into()
          , system_prompt: DEFAULT_SYSTEM_PROMPT.to_string()
          , temperature
          , max_tokens
        })
    }

    pub fn with_system_prompt(
      mut self
    , system_prompt: impl Into<String>
    ) -> Self
    {   self.system_prompt = system_prompt.into();
        self
    }

    /// Build parameters from raw host inputs keyed by input
    /// name. Optional inputs fall back to their defaults.
    pub fn from_inputs(inputs: &Map<String, Value>)
      -> Result<Self, Error>
    {   debug!("Building request parameters from {} inputs"
          , inputs.len());

        let api_url = required_str(inputs, "api_url")?;
        let api_token = required_str(inputs, "api_token")?;
        let prompt = required_str(inputs, "prompt")?;
        let model = required_str(inputs, "model")?;

        let temperature = required(inputs, "temperature")?
          .as_f64()
          .ok_or_else(|| wrong_type("temperature", "a number"))?;

        let max_tokens = required(inputs, "max_tokens")?
          .as_u64()
          .ok_or_else(|| {
            wrong_type("max_tokens", "a non-negative integer")
          })?;
        let max_tokens = u32::try_from(max_tokens)
          .map_err(|_| out_of_range_tokens(max_tokens))?;

        let system_prompt = match inputs.get("system_prompt")
        {   None | Some(Value::Null) => default_system_prompt()
          , Some(Value::String(s)) => s.clone()
          , Some(_) => {
              return Err(wrong_type("system_prompt", "a string"));
            }
        };

        RequestParameters::new(
          api_url, api_token, model, prompt, temperature, max_tokens
        )
        .map(|p| p.with_system_prompt(system_prompt))
    }

    pub fn api_url(&self) -> &str
    {   &self.api_url
    }

    pub fn api_token(&self) -> &str
    {   &self.api_token
    }

    pub fn model(&self) -> &str
    {   &self.model
    }

    pub fn prompt(&self) -> &str
    {   &self.prompt
    }

    pub fn system_prompt(&self) -> &str
    {   &self.system_prompt
    }

    pub fn temperature(&self) -> f64
    {   self.temperature
    }

    pub fn max_tokens(&self) -> u32
    {   self.max_tokens
    }
}

impl Default for RequestParameters
{   fn default() -> Self
    {   RequestParameters
        {   api_url: DEFAULT_API_URL.to_string()
          , api_token: String::new()
          , model: DEFAULT_MODEL.to_string()
          , prompt: DEFAULT_PROMPT.to_string()
          , system_prompt: DEFAULT_SYSTEM_PROMPT.to_string()
          , temperature: DEFAULT_TEMPERATURE
          , max_tokens: DEFAULT_MAX_TOKENS
        }
    }
}

fn validate_temperature(temperature: f64) -> Result<(), Error>
{   // NaN fails both comparisons
    if temperature >= MIN_TEMPERATURE
      && temperature <= MAX_TEMPERATURE
    {   return Ok(());
    }
    error!("Temperature out of range: {}", temperature);
    Err(Error::InvalidInput(format!(
      "temperature must be between {} and {}, got {}"
    , MIN_TEMPERATURE, MAX_TEMPERATURE, temperature
    )))
}

fn validate_max_tokens(max_tokens: u32) -> Result<(), Error>
{   if (MIN_MAX_TOKENS..=MAX_MAX_TOKENS).contains(&max_tokens)
    {   return Ok(());
    }
    error!("max_tokens out of range: {}", max_tokens);
    Err(out_of_range_tokens(max_tokens as u64))
}

fn out_of_range_tokens(max_tokens: u64) -> Error
{   Error::InvalidInput(format!(
      "max_tokens must be between {} and {}, got {}"
    , MIN_MAX_TOKENS, MAX_MAX_TOKENS, max_tokens
    ))
}

fn required<'a>(inputs: &'a Map<String, Value>, name: &str)
  -> Result<&'a Value, Error>
{   inputs.get(name)
      .filter(|v| !v.is_null())
      .ok_or_else(|| {
        error!("Missing required input: {}", name);
        Error::InvalidInput(
          format!("missing required input '{}'", name)
        )
      })
}

fn required_str(inputs: &Map<String, Value>, name: &str)
  -> Result<String, Error>
{   required(inputs, name)?
      .as_str()
      .map(str::to_string)
      .ok_or_else(|| wrong_type(name, "a string"))
}

fn wrong_type(name: &str, expected: &str) -> Error
{   error!("Input '{}' has the wrong type", name);
    Error::InvalidInput(
      format!("input '{}' must be {}", name, expected)
    )
}

/// Transport settings shared by every call a node makes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig
{   /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64
  , /// Custom User-Agent header
    #[serde(default)]
    pub user_agent: Option<String>
}

fn default_timeout_secs() -> u64
{   DEFAULT_TIMEOUT_SECS
}

impl Default for NodeConfig
{   fn default() -> Self
    {   NodeConfig
        {   timeout_secs: DEFAULT_TIMEOUT_SECS
          , user_agent: None
        }
    }
}
