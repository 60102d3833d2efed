use super::Source;
use crate::data::measurements::MeasurementSeries;
use crate::error::FetchError;
use crate::sheets::SheetsClient;

/// Polls the outdoor station spreadsheet.
pub struct SheetSource {
    client: SheetsClient,
}

impl SheetSource {
    pub fn new(client: SheetsClient) -> Self {
        Self { client }
    }
}

impl Source for SheetSource {
    type Output = MeasurementSeries;

    fn name(&self) -> &'static str {
        "sheet"
    }

    fn fetch(&mut self) -> Result<MeasurementSeries, FetchError> {
        let columns = self.client.fetch_columns()?;
        let series = MeasurementSeries::from_sheet_columns(&columns)?;
        log::info!("Fetched {} outdoor samples", series.len());
        Ok(series)
    }
}
