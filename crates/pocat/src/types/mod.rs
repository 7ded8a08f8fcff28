mod entry;
mod headers;
mod key;

pub use entry::{Entry, Variants};
pub use headers::Headers;
pub use key::MessageKey;
