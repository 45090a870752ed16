/// Status assigned to every new request
pub const STATUS_PENDING: &str = "Pending";

/// Status set once a volunteer accepts a request
pub const STATUS_ON_THE_WAY: &str = "On The Way";

/// Timestamp layout stored in the `requests.time` column
pub const REQUEST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lifetime of a session token issued at login (7 days)
pub const SESSION_TTL_SECS: i64 = 604_800;

/// Capacity of the in-process alert queue
/// Alerts beyond this are dropped with a warning rather than blocking the caller
pub const ALERT_QUEUE_CAPACITY: usize = 256;

/// Default Nominatim search endpoint used for address lookups
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Nominatim's usage policy requires an identifying user agent
pub const DEFAULT_GEOCODER_USER_AGENT: &str = "sea-backend/0.1 (emergency request geocoding)";

/// Default Twilio REST API base
pub const DEFAULT_TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Redirect targets returned by login
pub const REDIRECT_VOLUNTEER: &str = "/volunteer";
pub const REDIRECT_REQUESTER: &str = "/home";

// =============================================================================
// Response Messages
// =============================================================================

pub const MSG_ACCOUNT_CREATED: &str = "Account created!";
pub const MSG_REQUEST_SENT: &str = "Request sent successfully!";
pub const MSG_REQUEST_DELETED: &str = "Request deleted successfully!";
pub const MSG_LOCATION_UPDATED: &str = "Location updated";
pub const MSG_REQUESTS_CLEARED: &str = "All requests cleared successfully!";

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_INVALID_JSON: &str = "Invalid JSON";

pub const ERR_ALL_FIELDS_REQUIRED: &str = "All fields required";

pub const ERR_COORDINATES_NOT_NUMERIC: &str = "Latitude and longitude must be numeric";

pub const ERR_EMAIL_EXISTS: &str = "Email already exists!";

pub const ERR_INVALID_CREDENTIALS: &str = "Invalid credentials!";

/// Returned by accept when the id is unknown
pub const ERR_REQUEST_NOT_FOUND: &str = "Request not found";

/// Returned by delete when the id is unknown
pub const ERR_DELETE_NOT_FOUND: &str = "Request not found!";

pub const ERR_SERVER: &str = "Server error!";
