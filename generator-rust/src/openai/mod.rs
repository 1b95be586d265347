mod api;
mod strategy;

pub use strategy::{OpenAICompatibleStrategy, OpenAICompatibleStrategyOptions};
