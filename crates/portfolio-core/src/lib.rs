pub mod error;
pub mod matcher;
pub mod mcp_api;
pub mod model;
pub mod parser;
pub mod query;
pub mod search;
pub mod session;
pub mod synonyms;
