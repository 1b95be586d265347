mod strategy;

pub use strategy::{MockGenerateResult, MockStrategy};
