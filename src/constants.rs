/// Column names and fixed values used by the cleaning step.
/// These constants keep the transformation code and the tests in sync.

// Columns the cleaning step operates on
pub const PRICE_COL: &str = "price";
pub const LONGITUDE_COL: &str = "longitude";
pub const LATITUDE_COL: &str = "latitude";
pub const LAST_REVIEW_COL: &str = "last_review";

// Geographic bounding box for valid listings (fixed, not configurable)
pub const MIN_LONGITUDE: f64 = -74.25;
pub const MAX_LONGITUDE: f64 = -73.50;
pub const MIN_LATITUDE: f64 = 40.5;
pub const MAX_LATITUDE: f64 = 41.2;

// Format the last_review column is stored in
pub const LAST_REVIEW_FORMAT: &str = "%Y-%m-%d";

// File name the cleaned dataset is written under before publishing
pub const CLEAN_FILE_NAME: &str = "clean_sample.csv";

// Job type recorded on every run
pub const JOB_TYPE: &str = "basic_cleaning";
