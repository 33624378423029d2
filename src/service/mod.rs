//! Database-backed operations, one module per resource.
//!
//! Every function takes the pool explicitly and reports failures as `AppError`.

pub mod attendance;
pub mod department;
pub mod employee;
pub mod leave_request;
pub mod outsourcing_company;
pub mod outsourcing_employee;
pub mod position;
pub mod user;
