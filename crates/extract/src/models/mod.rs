mod format;
mod index;
mod lang;

pub use self::format::Format;
pub use self::index::{IndexEntry, IndexSnapshot};
pub use self::lang::LanguageTag;
