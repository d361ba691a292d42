// Tabular (CSV) encoding of a symbol's bar history.
use crate::error::EngineError;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use shared::models::Bar;
use std::io::{Read, Write};

// Column order of every history file this engine writes. Older files may lack
// the derived columns; they read back as absent.
pub const HISTORY_HEADER: [&str; 9] = [
    "date",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "turnover",
    "price_change",
    "change_ratio",
];

pub struct HistoryCsv;

impl HistoryCsv {
    /// Reads every row of a history file. Columns are matched by header name,
    /// unknown columns are ignored, and empty derived cells mean "absent".
    pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, EngineError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut bars = Vec::new();
        for (idx, result) in rdr.deserialize::<Bar>().enumerate() {
            let bar = result.map_err(|e| {
                EngineError::StorageReadError(format!("Error reading CSV record at line {}: {}", idx + 2, e))
            })?;
            bars.push(bar);
        }
        Ok(bars)
    }

    /// Writes the header and one row per bar, in the order given.
    /// Non-finite values are written as `NaN`, `inf` or `-inf`.
    pub fn write_bars<W: Write>(writer: W, bars: &[Bar]) -> Result<(), EngineError> {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
        wtr.write_record(HISTORY_HEADER)?;
        for bar in bars {
            wtr.serialize(bar)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
