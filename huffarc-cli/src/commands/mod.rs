//! Command implementations for HuffArc CLI.

pub mod compress;
pub mod decompress;
pub mod info;
pub mod list;

pub use compress::{cmd_compress, cmd_compress_dir};
pub use decompress::cmd_decompress;
pub use info::cmd_info;
pub use list::cmd_list;
pub use test::cmd_test;
