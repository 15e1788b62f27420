/// CRUD and constraint tests for the `customers` table
pub mod customer_tests;
