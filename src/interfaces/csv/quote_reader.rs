use crate::domain::quote::{QuoteRequest, SquareFeet, Zipcode};
use crate::error::{QuoteError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One input row: `square_footage, additional_hvac_systems, zipcode[, services]`.
///
/// `services` is a `;`-separated list of add-on keys.
#[derive(Debug, Deserialize)]
struct QuoteRow {
    square_footage: Decimal,
    additional_hvac_systems: u32,
    zipcode: String,
    #[serde(default)]
    services: Option<String>,
}

impl TryFrom<QuoteRow> for QuoteRequest {
    type Error = QuoteError;

    fn try_from(row: QuoteRow) -> Result<Self> {
        let services = row
            .services
            .as_deref()
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        Ok(QuoteRequest::new(
            SquareFeet::new(row.square_footage)?,
            row.additional_hvac_systems,
            Zipcode::parse(&row.zipcode)?,
        )
        .with_services(services))
    }
}

/// Reads quote requests from a CSV source.
///
/// Wraps `csv::Reader` and yields one `Result<QuoteRequest>` per row, so a bad row
/// can be reported without stopping the batch.
pub struct QuoteReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> QuoteReader<R> {
    /// Creates a new `QuoteReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads, deserializes and validates each row.
    pub fn requests(self) -> impl Iterator<Item = Result<QuoteRequest>> {
        self.reader
            .into_deserialize::<QuoteRow>()
            .map(|row| QuoteRequest::try_from(row.map_err(QuoteError::from)?))
    }
}
