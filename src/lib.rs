pub mod error;
pub mod config;
pub mod request;
pub mod node;
pub mod client;

/*

llm-node: one workflow node that calls an OpenAI-compatible
chat-completion endpoint and hands back two strings,
(response, full_json), for downstream nodes.

llm-node/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports
│   ├── error.rs        # Transport / decode / unexpected errors
│   ├── config.rs       # Validated request parameters, node config
│   ├── request.rs      # Wire body and the two-string outcome
│   ├── node.rs         # Registration metadata and input schema
│   ├── client.rs       # The node itself
│   └── bin/llm-node.rs # Run one call from a JSON input file
└── tests/

*/

pub use client::ChatCompletionNode;
pub use config::{NodeConfig, RequestParameters};
pub use error::Error;
pub use node::NodeDescriptor;
pub use request::CallOutcome;
