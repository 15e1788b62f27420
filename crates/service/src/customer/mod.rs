//! Customer module: three-layer architecture (domain, repository, service).
//!
//! The service owns the email-uniqueness invariant and the error taxonomy;
//! repositories own persistence and audit stamping.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::{Customer, CustomerDraft, CustomerRequest, CustomerResponse};
pub use repository::CustomerRepository;
pub use service::CustomerService;
