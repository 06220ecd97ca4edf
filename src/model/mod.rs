//! Dataset model.
//!
//! Rows flow in from dataset files, conversion results flow out, and
//! messages carry the conversation sent to the model backend.

mod message;
mod result;
mod row;

pub use message::*;
pub use result::*;
pub use row::*;
