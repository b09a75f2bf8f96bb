pub mod config;
pub mod dialog;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use dialog::{DialogCallbacks, DialogSnapshot, DialogState, PaymentDialog, Toast};
pub use startup::{AppState, Application};
