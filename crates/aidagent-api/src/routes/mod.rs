pub mod alerts;
pub mod chat;
pub mod health;
