/// UTM projection constants
pub const UTM_SCALE_FACTOR: f64 = 0.9996;
pub const FALSE_EASTING: f64 = 500_000.0;
pub const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Default reference system (SIRGAS2000 / UTM 23S)
pub const DEFAULT_ZONE: u8 = 23;

/// Output formatting
pub const INTERNATIONAL_SECONDS_PRECISION: usize = 2;
pub const BRAZILIAN_SECONDS_PRECISION: usize = 3;
pub const DECIMAL_DEGREES_PRECISION: usize = 8;

/// Columns appended in append mode
pub const LONGITUDE_DMS_COLUMN: &str = "Longitude_DMS";
pub const LATITUDE_DMS_COLUMN: &str = "Latitude_DMS";
pub const LONGITUDE_DECIMAL_COLUMN: &str = "Longitude_Decimal";
pub const LATITUDE_DECIMAL_COLUMN: &str = "Latitude_Decimal";

/// File handling
pub const DEFAULT_INPUT_EXTENSION: &str = "csv";
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_convertido";
pub const DEFAULT_OUTPUT_DELIMITER: u8 = b';';
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
pub const PREFERENCES_FILE: &str = "config.json";

/// Header substrings tried, in order, when detecting coordinate columns
pub const X_COLUMN_PATTERNS: &[&str] = &["x", "easting", "este", "e", "utm_x", "coord_x"];
pub const Y_COLUMN_PATTERNS: &[&str] = &["y", "northing", "norte", "n", "utm_y", "coord_y"];
