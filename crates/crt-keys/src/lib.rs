//! # crt-keys
//!
//! Public-key lookup providers for the crtauth authentication plugin.
//!
//! The crtauth protocol verifies challenge responses against users'
//! SSH public keys. This crate supplies the sources those keys come
//! from:
//!
//! - [`FileKeyProvider`] - keys stored as files under a root directory
//! - [`LdapKeyProvider`] - keys stored as a directory attribute
//!
//! Providers implement the [`KeyProvider`] trait and are consulted by
//! the authenticator in the order they were attached.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod file;
pub mod ldap;
pub mod provider;

pub use error::{KeyLookupError, KeyLookupResult};
pub use file::FileKeyProvider;
pub use ldap::LdapKeyProvider;
pub use provider::KeyProvider;
