use crate::error::{ConversionError, Result};
use crate::models::{
    Axis, ConvertedRow, OutputMode, PlanarPoint, ProjectionConfig, RowOutcome, Table,
};
use crate::projection::UtmProjector;
use crate::utils::constants::{
    BRAZILIAN_SECONDS_PRECISION, DECIMAL_DEGREES_PRECISION, INTERNATIONAL_SECONDS_PRECISION,
    LATITUDE_DECIMAL_COLUMN, LATITUDE_DMS_COLUMN, LONGITUDE_DECIMAL_COLUMN, LONGITUDE_DMS_COLUMN,
};
use crate::utils::coordinates::{
    format_brazilian, format_decimal, format_international, parse_planar_value, to_dms,
};

/// Converts table rows: parse cells, project, render every output format.
#[derive(Debug, Clone)]
pub struct RowConverter {
    projector: UtmProjector,
    international_precision: usize,
    brazilian_precision: usize,
    decimal_precision: usize,
}

impl RowConverter {
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            projector: UtmProjector::new(config),
            international_precision: INTERNATIONAL_SECONDS_PRECISION,
            brazilian_precision: BRAZILIAN_SECONDS_PRECISION,
            decimal_precision: DECIMAL_DEGREES_PRECISION,
        }
    }

    pub fn with_international_precision(mut self, precision: usize) -> Self {
        self.international_precision = precision;
        self
    }

    pub fn with_brazilian_precision(mut self, precision: usize) -> Self {
        self.brazilian_precision = precision;
        self
    }

    pub fn with_decimal_precision(mut self, precision: usize) -> Self {
        self.decimal_precision = precision;
        self
    }

    pub fn projector(&self) -> &UtmProjector {
        &self.projector
    }

    pub fn convert_point(&self, point: PlanarPoint) -> Result<ConvertedRow> {
        let geographic = self.projector.inverse(point)?;
        let lon = to_dms(geographic.longitude_deg);
        let lat = to_dms(geographic.latitude_deg);

        Ok(ConvertedRow {
            longitude_deg: geographic.longitude_deg,
            latitude_deg: geographic.latitude_deg,
            lon_dms: format_international(&lon, self.international_precision),
            lat_dms: format_international(&lat, self.international_precision),
            lon_dms_br: format_brazilian(&lon, Axis::Longitude, self.brazilian_precision),
            lat_dms_br: format_brazilian(&lat, Axis::Latitude, self.brazilian_precision),
            lon_dec: format_decimal(geographic.longitude_deg, self.decimal_precision),
            lat_dec: format_decimal(geographic.latitude_deg, self.decimal_precision),
        })
    }

    /// Parse raw X/Y cells (decimal comma allowed) and convert them.
    pub fn convert_cells(&self, x_cell: &str, y_cell: &str) -> Result<ConvertedRow> {
        let easting = parse_planar_value(x_cell)?;
        let northing = parse_planar_value(y_cell)?;
        self.convert_point(PlanarPoint::new(easting, northing))
    }

    /// One outcome per data row. Row 0 is always `Header` and never parsed.
    pub fn convert_table(&self, table: &Table, x_col: usize, y_col: usize) -> Vec<RowOutcome> {
        table
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                if index == 0 {
                    return RowOutcome::Header;
                }

                let x_cell = row.get(x_col).map(String::as_str).unwrap_or("");
                let y_cell = row.get(y_col).map(String::as_str).unwrap_or("");

                match self.convert_cells(x_cell, y_cell) {
                    Ok(converted) => RowOutcome::Converted(converted),
                    Err(e) => RowOutcome::Skipped {
                        reason: e.to_string(),
                    },
                }
            })
            .collect()
    }
}

/// Build the table to persist from the source table and its row outcomes.
pub fn build_output_table(
    table: &Table,
    outcomes: &[RowOutcome],
    mode: OutputMode,
    x_col: usize,
    y_col: usize,
) -> Result<Table> {
    if outcomes.len() != table.row_count() {
        return Err(ConversionError::Config(format!(
            "{} outcomes for {} rows",
            outcomes.len(),
            table.row_count()
        )));
    }

    match mode {
        OutputMode::Append => {
            let mut headers = table.headers.clone();
            headers.extend(
                [
                    LONGITUDE_DMS_COLUMN,
                    LATITUDE_DMS_COLUMN,
                    LONGITUDE_DECIMAL_COLUMN,
                    LATITUDE_DECIMAL_COLUMN,
                ]
                .map(String::from),
            );

            let rows = table
                .rows
                .iter()
                .zip(outcomes)
                .map(|(row, outcome)| {
                    let mut out = row.clone();
                    match outcome.converted() {
                        Some(c) => out.extend([
                            c.lon_dms.clone(),
                            c.lat_dms.clone(),
                            c.lon_dec.clone(),
                            c.lat_dec.clone(),
                        ]),
                        None => out.extend(std::iter::repeat(String::new()).take(4)),
                    }
                    out
                })
                .collect();

            Ok(Table::new(headers, rows))
        }
        OutputMode::InPlace => {
            let rows = table
                .rows
                .iter()
                .zip(outcomes)
                .map(|(row, outcome)| {
                    let mut out = row.clone();
                    if let Some(c) = outcome.converted() {
                        if let Some(cell) = out.get_mut(x_col) {
                            *cell = c.lon_dms_br.clone();
                        }
                        if let Some(cell) = out.get_mut(y_col) {
                            *cell = c.lat_dms_br.clone();
                        }
                    }
                    out
                })
                .collect();

            Ok(Table::new(table.headers.clone(), rows))
        }
    }
}
