use std::io::Write;

use anyhow::Result;
use tempfile::NamedTempFile;
use vm::trace::TraceFile;

// Write trace lines to a temporary file; keep the handle alive while in use
pub fn write_trace<S: AsRef<str>>(lines: &[S]) -> Result<(NamedTempFile, TraceFile)> {
    let mut file = NamedTempFile::new()?;

    for line in lines {
        writeln!(file, "{}", line.as_ref())?;
    }
    file.flush()?;

    let trace = TraceFile::new(file.path());
    Ok((file, trace))
}

// One read reference per page, addresses inside the page vary
pub fn page_lines(pages: &[u64]) -> Vec<String> {
    pages
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:08x} R", (p << 12) | ((i as u64 * 0x40) & 0xFFF)))
        .collect()
}

// Deterministic pseudo-random trace with some locality and ~1/4 writes
pub fn generated_lines(count: usize, pages: u64, seed: u64) -> Vec<String> {
    let mut state = seed;
    let mut current = 0u64;

    (0..count)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let roll = state >> 33;

            if roll % 4 == 0 {
                current = (roll >> 4) % pages;
            }

            let offset = (roll >> 8) & 0xFFF;
            let op = if (roll >> 2) % 4 == 0 { 'W' } else { 'R' };

            format!("{:x} {}", (current << 12) | offset, op)
        })
        .collect()
}
