//! Core types shared by the codecs.

mod dest_dir;
mod entry;

pub use dest_dir::DestDir;
pub use entry::ArchiveEntry;
pub use entry::DeferredLink;
pub use entry::EntryKind;
pub use entry::entry_name;
pub use entry::entry_path;
