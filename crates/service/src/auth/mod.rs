//! Auth module: domain types, repository abstraction, credential and token
//! primitives, and the registration/login workflows on top of them.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repo;
pub mod repository;
pub mod service;
pub mod token;

pub use service::AuthService;
pub use token::TokenService;
