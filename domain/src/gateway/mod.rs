//! Clients for the external services the platform talks to: the payment
//! provider (hosted checkout + webhook signatures), the transactional email
//! API, and the document blob store.

pub mod blob_store;
pub mod mailersend;
pub mod stripe;
