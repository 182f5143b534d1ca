//! Domain entities for the database layer

pub mod cart;
pub mod chat;
pub mod content;
pub mod event;
pub mod payment;
pub mod product;
pub mod user;
