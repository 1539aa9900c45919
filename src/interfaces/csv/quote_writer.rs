use crate::application::quoting::Quote;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// One output row. Currency is rounded to cents.
#[derive(Debug, Serialize)]
struct QuoteRecord<'a> {
    zipcode: &'a str,
    square_footage: Decimal,
    additional_hvac_systems: u32,
    sqft_charge: Decimal,
    hvac_charge: Decimal,
    zipcode_charge: Decimal,
    subtotal: Decimal,
    discount: Decimal,
    total: Decimal,
    clean_and_seal_price: Decimal,
    clean_and_seal_total: Decimal,
    add_on_total: Decimal,
}

impl<'a> From<&'a Quote> for QuoteRecord<'a> {
    fn from(quote: &'a Quote) -> Self {
        let b = &quote.breakdown;
        Self {
            zipcode: quote.request.zipcode.as_str(),
            square_footage: quote.request.square_footage.value().normalize(),
            additional_hvac_systems: quote.request.additional_hvac_systems,
            sqft_charge: b.sqft_charge.rounded(),
            hvac_charge: b.hvac_charge.rounded(),
            zipcode_charge: b.zipcode_charge.rounded(),
            subtotal: b.subtotal.rounded(),
            discount: b.discount.rounded(),
            total: b.total.rounded(),
            clean_and_seal_price: b.clean_and_seal_price.rounded(),
            clean_and_seal_total: b.clean_and_seal_total.rounded(),
            add_on_total: b.add_on_total.rounded(),
        }
    }
}

/// Writes priced quotes as CSV, one row per quote, with a header row.
pub struct QuoteWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> QuoteWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_quote(&mut self, quote: &Quote) -> Result<()> {
        self.writer.serialize(QuoteRecord::from(quote))?;
        Ok(())
    }

    pub fn write_quotes<'q>(&mut self, quotes: impl IntoIterator<Item = &'q Quote>) -> Result<()> {
        for quote in quotes {
            self.write_quote(quote)?;
        }
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
