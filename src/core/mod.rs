// src/core/mod.rs

pub mod corpus;
pub mod engine;
pub mod pool;
pub mod tokenizer;
pub mod types;
