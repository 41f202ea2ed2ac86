//! Provider integration services

pub mod acr_client;
pub mod normalizer;
pub mod signer;
