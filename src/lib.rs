pub mod chunk;
pub mod config;
pub mod discovery;
pub mod error;
pub mod pipeline;
pub mod rate_limit;
pub mod segment;
pub mod translator;
pub mod validator;
