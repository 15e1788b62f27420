//! Service layer providing the customer lifecycle and the notification facade.
//! - Separates business rules from data access (`CustomerRepository`).
//! - Reuses the entity definitions in the `models` crate.
//! - Errors carry structured context; message text is resolved by the caller.

pub mod errors;
pub mod validation;
pub mod customer;
pub mod notification;
#[cfg(test)]
pub mod test_support;
