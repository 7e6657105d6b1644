//! CSV candle file adapter.
//!
//! Expected header: `open_time,open,high,low,close,volume,product_id`, with
//! `open_time` in epoch milliseconds.

use crate::domain::candle::Candle;
use crate::domain::error::EngineError;
use crate::ports::data_port::CandleSource;
use std::fs;
use std::path::PathBuf;

pub struct CsvCandleAdapter {
    path: PathBuf,
}

impl CsvCandleAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn parse(content: &str) -> Result<Vec<Candle>, EngineError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut candles = Vec::new();
        for (i, result) in rdr.deserialize::<Candle>().enumerate() {
            let candle = result.map_err(|e| EngineError::Data {
                reason: format!("CSV parse error at record {}: {}", i + 1, e),
            })?;
            candles.push(candle);
        }
        candles.sort_by_key(|c| c.open_time);
        Ok(candles)
    }
}

impl CandleSource for CsvCandleAdapter {
    fn fetch_candles(&self, product_id: Option<&str>) -> Result<Vec<Candle>, EngineError> {
        let content = fs::read_to_string(&self.path).map_err(|e| EngineError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut candles = Self::parse(&content)?;
        if let Some(product) = product_id {
            candles.retain(|c| c.product_id == product);
        }
        Ok(candles)
    }
}
