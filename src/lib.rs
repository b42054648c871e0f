pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod llm;
pub mod notice;
pub mod paths;
pub mod progression;
pub mod prompts;
pub mod session;
pub mod state;
pub mod store;

#[cfg(test)]
pub mod testing;
