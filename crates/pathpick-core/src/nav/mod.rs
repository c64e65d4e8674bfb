//! Query navigation.
//!
//! Path [`resolve`]-ution, row classification ([`filter`]), the
//! [`query::QueryState`] machine, and [`confirm`]-ation of the selected row.

pub mod confirm;
pub mod filter;
pub mod query;
pub mod resolve;
