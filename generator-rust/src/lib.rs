pub mod anthropic;
mod client_utils;
mod errors;
pub mod google;
pub mod openai;
pub mod opentelemetry;
mod payload_utils;
pub mod prompts;
mod registry;
mod strategy;
mod types;
pub mod uigen_test;

pub use errors::*;
pub use payload_utils::{parse_component, parse_fenced_component, strip_code_fences};
pub use registry::{Dispatcher, DispatcherOptions, StrategyRegistry};
pub use strategy::GenerationStrategy;
pub use types::*;
