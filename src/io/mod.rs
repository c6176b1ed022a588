//! File-backed collaborators: MIME lookup and static resource serving.

pub mod mime;
pub mod static_resolver;

pub use mime::{MimeCache, MimeError};
pub use static_resolver::{FileStaticResolver, StaticResolver};
