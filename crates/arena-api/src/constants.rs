/// API version prefix for all routes
pub const API_PREFIX: &str = "/api/v0";

/// Header carrying the caller's API key
pub const API_KEY_HEADER: &str = "auth-apikey";

/// Header carrying the machine-readable error code on error responses
pub const ERROR_CODE_HEADER: &str = "x-error-code";

/// Content-Disposition sent with a downloaded submission archive
pub const ARCHIVE_CONTENT_DISPOSITION: &str = "attachment; filename=code.zip";
