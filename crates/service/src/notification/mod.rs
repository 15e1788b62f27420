//! Notification facade: forwards customer notification calls to the external
//! notification service and degrades to fixed fallback payloads when it is
//! unavailable. Failures here never reach the customer lifecycle.

pub mod circuit_breaker;
pub mod client;
pub mod domain;
pub mod fallback;
pub mod service;

pub use client::{HttpNotificationClient, NotificationClient, Remote};
pub use fallback::FallbackNotificationClient;
pub use service::CustomerNotificationService;
