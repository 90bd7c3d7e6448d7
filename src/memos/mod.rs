//! Voice memos
//!
//! The memo entity, its repository binding, and the service layer carrying
//! the validation rules.

mod memo;
mod service;

pub use memo::{Memo, MemoDraft, MemoPatch};
pub use service::{MemoError, MemoService};
