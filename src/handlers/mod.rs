pub mod common;

// Catalogue and registers
pub mod clients;
pub mod groups;
pub mod menu_items;
pub mod suppliers;
pub mod tables;

// Floor operations
pub mod orders;
pub mod stock;

pub mod health;
pub mod reports;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;
