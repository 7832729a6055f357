//! Email Router: classify inbound business email with a generative
//! backend and propose internal staff to route it to.

pub mod config;
pub mod directory;
pub mod error;
pub mod input;
pub mod llm;
pub mod pipeline;
pub mod report;
pub mod taxonomy;
