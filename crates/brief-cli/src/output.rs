//! Summary presentation

use brief_core::Summary;
use std::io::{self, Write};

/// Write `Summary: {summary}` followed by a newline
pub fn print_summary<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    writeln!(out, "Summary: {summary}")?;
    out.flush()
}
