// Record shapes exchanged with the language model and returned to callers.

pub mod diet;
pub mod indication;
pub mod language;
pub mod menu;
pub mod profile;
