//! Route modules for the API server
//!
//! - login: credential exchange for an access token
//! - transactions: CRUD over the transaction store, bearer protected

pub mod login;
pub mod transactions;
