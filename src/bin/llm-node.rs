//! Run the LLM node once from the command line.
//!
//! Usage: llm-node [inputs.json]
//!
//! Inputs are a JSON object keyed by node input name, read from
//! the given file or stdin. Missing inputs take the node's
//! defaults; `api_token` falls back to $LLM_API_TOKEN.

use std::io::Read;
use log::{debug, error};
use serde_json::{Map, Value};

use llm_node::{ChatCompletionNode, NodeDescriptor};

const TOKEN_ENV_VAR: &str = "LLM_API_TOKEN";

fn read_inputs() -> Result<Map<String, Value>, String>
{   let text = match std::env::args().nth(1)
    {   Some(path) => {
          debug!("Reading inputs from {}", path);
          std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {}", path, e))?
        }
      , None => {
          debug!("Reading inputs from stdin");
          let mut buf = String::new();
          std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
          buf
        }
    };

    if text.trim().is_empty()
    {   return Ok(Map::new());
    }

    match serde_json::from_str(&text)
    {   Ok(Value::Object(map)) => Ok(map)
      , Ok(_) => Err("Inputs must be a JSON object".to_string())
      , Err(e) => Err(format!("Invalid inputs JSON: {}", e))
    }
}

fn main()
{   env_logger::init();

    let given = match read_inputs()
    {   Ok(given) => given
      , Err(msg) => {
          error!("{}", msg);
          eprintln!("{}", msg);
          std::process::exit(2);
        }
    };

    let mut inputs = NodeDescriptor::llm_node().default_inputs();
    if !given.contains_key("api_token")
    {   if let Ok(token) = std::env::var(TOKEN_ENV_VAR)
        {   debug!("Using token from {}", TOKEN_ENV_VAR);
            inputs.insert("api_token".to_string(), Value::String(token));
        }
    }
    inputs.extend(given);

    let outcome = ChatCompletionNode::new().execute_blocking(&inputs);
    println!("{}", outcome.response);
    println!("{}", outcome.full_json);
}
