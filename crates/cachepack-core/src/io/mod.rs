//! I/O utilities.

mod counting;
pub mod lines;

pub use counting::CountingWriter;
pub use lines::copy_file;
pub use lines::read_lines;
pub use lines::write_lines;
