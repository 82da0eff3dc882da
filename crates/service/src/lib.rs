//! Business layer for the identity service, independent of the web framework.
//! - Registration and login workflows with typed domain errors.
//! - Credential hashing/verification and bearer-token issuance/validation.
//! - Persistence behind a repository trait with a SeaORM implementation.

pub mod auth;
