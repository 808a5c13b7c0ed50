//! Common types shared by filters, specifications and backing stores.

mod type_utils;
mod value;

pub use type_utils::*;
pub use value::*;
