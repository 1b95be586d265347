mod api;
mod strategy;

pub use strategy::{AnthropicStrategy, AnthropicStrategyOptions};
