use std::io::Write;

use crate::color::RankedEntry;
use crate::errors::{PaletteError, Result};

/// One processed input and its ranked dominant colors. Built right before
/// serialization and dropped right after; records are never retained.
pub struct ImageRecord<'a> {
    pub url: &'a str,
    pub colors: &'a [RankedEntry],
}

/// Writes one CSV record per input.
///
/// Successful inputs: `<url>,"[r, g, b]","[r, g, b]","[r, g, b]"`.
/// Failed inputs are written as `<url>,!<ERROR_CODE>` instead of being
/// omitted, so every input line appears in the output exactly once and in
/// input order.
pub struct RecordWriter<W: Write> {
    out: W,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_record(&mut self, record: &ImageRecord) -> Result<()> {
        let mut line = String::from(record.url);
        for entry in record.colors {
            line.push_str(",\"");
            line.push_str(&entry.color.to_string());
            line.push('"');
        }
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    pub fn write_error(&mut self, url: &str, error: &PaletteError) -> Result<()> {
        writeln!(self.out, "{},!{}", url, error.error_code())?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
