pub mod commit;
pub mod diff;
pub mod file_version;

pub use commit::*;
pub use diff::*;
pub use file_version::*;
