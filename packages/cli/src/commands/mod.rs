pub mod convert;
pub mod init;
pub mod session;

pub use convert::{deserialize, roundtrip, serialize, ConvertArgs, RoundtripArgs};
pub use init::{init, InitArgs};
pub use session::{session, SessionArgs};

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read a file, or stdin when no path is given
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Cannot read stdin")?;
            Ok(buffer)
        }
    }
}
