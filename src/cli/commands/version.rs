//! Version command implementation.

use crate::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput<'a> {
    name: &'a str,
    version: &'a str,
    build: &'a str,
    description: &'a str,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let output = VersionOutput {
        name: "discus",
        version: env!("CARGO_PKG_VERSION"),
        build: if cfg!(debug_assertions) {
            "dev"
        } else {
            "release"
        },
        description: env!("CARGO_PKG_DESCRIPTION"),
    };

    if json {
        let payload = serde_json::to_string(&output)?;
        println!("{payload}");
        return Ok(());
    }

    println!("{} {} ({})", output.name, output.version, output.build);
    println!("{}", output.description);
    Ok(())
}
