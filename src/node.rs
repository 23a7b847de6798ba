//! Registration metadata the host reads to list the node
//! and render its input form

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::{
  DEFAULT_API_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
  DEFAULT_PROMPT, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE,
  MAX_MAX_TOKENS, MAX_TEMPERATURE, MIN_MAX_TOKENS, MIN_TEMPERATURE,
};

pub const NODE_NAME: &str = "LLMNode";
pub const DISPLAY_NAME: &str = "LLM API Call";
pub const CATEGORY: &str = "ComfyUI-LLM";
pub const RETURN_TYPES: [&str; 2] = ["STRING", "STRING"];
pub const RETURN_NAMES: [&str; 2] = ["response", "full_json"];

/// Widget type of a node input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum InputKind
{   String
    {   multiline: bool
    }
  , Float
    {   min: f64
      , max: f64
      , step: f64
    }
  , Int
    {   min: u32
      , max: u32
      , step: u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec
{   pub name: String
  , pub kind: InputKind
  , pub default: Value
  , pub required: bool
}

impl InputSpec
{   fn string(name: &str, default: &str, multiline: bool) -> Self
    {   InputSpec
        {   name: name.to_string()
          , kind: InputKind::String { multiline }
          , default: json!(default)
          , required: true
        }
    }

    fn optional(mut self) -> Self
    {   self.required = false;
        self
    }
}

/// Everything the host needs to register the node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor
{   pub name: String
  , pub display_name: String
  , pub category: String
  , pub inputs: Vec<InputSpec>
  , pub return_types: Vec<String>
  , pub return_names: Vec<String>
}

impl NodeDescriptor
{   pub fn llm_node() -> Self
    {   NodeDescriptor
        {   name: NODE_NAME.to_string()
          , display_name: DISPLAY_NAME.to_string()
          , category: CATEGORY.to_string()
          , inputs: vec![
              InputSpec::string("api_url", DEFAULT_API_URL, false)
            , InputSpec::string("api_token", "", false)
            , InputSpec::string("prompt", DEFAULT_PROMPT, true)
            , InputSpec::string("model", DEFAULT_MODEL, false)
            , InputSpec
              {   name: "temperature".to_string()
                , kind: InputKind::Float
                  {   min: MIN_TEMPERATURE
                    , max: MAX_TEMPERATURE
                    , step: 0.1
                  }
                , default: json!(DEFAULT_TEMPERATURE)
                , required: true
              }
            , InputSpec
              {   name: "max_tokens".to_string()
                , kind: InputKind::Int
                  {   min: MIN_MAX_TOKENS
                    , max: MAX_MAX_TOKENS
                    , step: 1
                  }
                , default: json!(DEFAULT_MAX_TOKENS)
                , required: true
              }
            , InputSpec::string(
                "system_prompt", DEFAULT_SYSTEM_PROMPT, true
              ).optional()
            ]
          , return_types: RETURN_TYPES
              .iter().map(|s| s.to_string()).collect()
          , return_names: RETURN_NAMES
              .iter().map(|s| s.to_string()).collect()
        }
    }

    pub fn input(&self, name: &str) -> Option<&InputSpec>
    {   self.inputs.iter().find(|i| i.name == name)
    }

    /// Inputs filled with their defaults, as a host would
    /// pre-populate the form
    pub fn default_inputs(&self) -> serde_json::Map<String, Value>
    {   self.inputs
          .iter()
          .map(|i| (i.name.clone(), i.default.clone()))
          .collect()
    }
}
