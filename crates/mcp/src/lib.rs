//! # hap-mcp
//!
//! MCP server exposing the HAP open API as LLM-facing tools over stdio.
//! Listing tools decode platform documents through `hap-core` into readable
//! tables or normalized JSON; everything else forwards through `hap-api`.

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
pub use tools::{register_all, Tool, ToolRegistry};
