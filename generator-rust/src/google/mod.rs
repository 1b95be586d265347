mod api;
mod strategy;

pub use strategy::{GoogleStrategy, GoogleStrategyOptions};
