pub mod attendance;
pub mod department;
pub mod employee;
pub mod leave_request;
pub mod outsourcing_company;
pub mod outsourcing_employee;
pub mod position;
pub mod role;
pub mod user;

use serde::{Deserialize, Deserializer};

/// PATCH field that may be cleared: absent is `None`, `null` is `Some(None)`.
/// Pair with `#[serde(default)]` so a missing key stays `None`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
