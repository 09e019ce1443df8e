use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

pub fn ensure_dir(p: &Path) -> Result<()> {
    std::fs::create_dir_all(p).with_context(|| format!("create_dir_all {}", p.display()))
}

/// Reads `path` to a string; `-` reads stdin.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .with_context(|| "reading stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading input: {}", path.display()))
}
