//! Constants for the employee report service

/// Route: service index
pub const ROUTE_INDEX: &str = "/";

/// Route: document store backed employee listing
pub const ROUTE_DOCUMENTS: &str = "/appwrite-data";

/// Route: SQLite backed employee listing
pub const ROUTE_EMPLOYEES: &str = "/employees";

/// Route: liveness probe
pub const ROUTE_HEALTH: &str = "/health";

/// Route: Prometheus scrape endpoint
#[cfg(feature = "metrics")]
pub const ROUTE_METRICS: &str = "/metrics";

/// Greeting returned by the index route
pub const WELCOME_MESSAGE: &str = "Welcome to the API";

/// Routes advertised by the index route
pub const ADVERTISED_ENDPOINTS: &[&str] = &[ROUTE_DOCUMENTS, ROUTE_EMPLOYEES];

/// Health status: success
pub const STATUS_OK: &str = "ok";

/// Default employee table
pub const DEFAULT_EMPLOYEE_TABLE: &str = "Employee_Demo";

/// Default SQLite database file
pub const DEFAULT_EMPLOYEE_DB_PATH: &str = "Chinook.db";

/// Default document collection
pub const DEFAULT_COLLECTION_ID: &str = "emp_table";

/// Column holding the joining date
pub const COLUMN_DATE_OF_JOINING: &str = "date of joining";

/// Column holding the resignation date
pub const COLUMN_DATE_OF_RESIGNATION: &str = "date of Resignation";

/// Placeholder character used by field masking
pub const MASK_CHAR: char = '*';

/// Number of leading characters left visible by field masking
pub const MASK_VISIBLE_PREFIX: usize = 2;

/// Header carrying the document store project id
pub const HEADER_PROJECT: &str = "X-Appwrite-Project";

/// Header carrying the document store API key
pub const HEADER_API_KEY: &str = "X-Appwrite-Key";

/// Allowed CORS origin when none is configured
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
