pub mod checks;
pub mod classify;
pub mod extract;
pub mod handlers;
pub mod menu;
pub mod orchestrator;
pub mod prompts;
