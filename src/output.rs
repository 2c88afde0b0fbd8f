use std::io::{self, Write};

use serde::Serialize;

use crate::app::ConversionResult;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Text,
    Json,
}

pub struct SummaryOutput;

impl SummaryOutput {
    pub fn print(mode: OutputMode, result: &ConversionResult) -> io::Result<()> {
        match mode {
            OutputMode::Text => {
                let mut stdout = io::stdout();
                writeln!(stdout, "Wrote {}", result.output)
            }
            OutputMode::Json => Self::print_json(result),
        }
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
