pub mod collections;
pub mod models;
pub mod session;
pub mod store;
pub mod templates;
pub mod theme;
pub mod validation;
