//! Property names written on every transaction record.

pub const METHOD: &str = "Method";
pub const PATH: &str = "Path";
pub const HOST: &str = "Host";
pub const PORT: &str = "Port";
pub const URL_BASE: &str = "UrlBase";
pub const QUERY: &str = "Query";
pub const QUERY_STRING: &str = "QueryString";
pub const REQUEST_HEADERS: &str = "RequestHeaders";
pub const REQUEST_BODY: &str = "RequestBody";
pub const IP: &str = "Ip";
pub const REQUEST_KEY: &str = "RequestKey";
pub const ACCOUNT_ID: &str = "AccountId";
pub const IS_SUCCESSFUL: &str = "IsSuccessful";
pub const STATUS_CODE: &str = "StatusCode";
pub const STATUS_DESCRIPTION: &str = "StatusDescription";
pub const STATUS_CODE_FAMILY: &str = "StatusCodeFamily";
pub const PROTOCOL_VERSION: &str = "ProtocolVersion";
pub const ERROR_EXCEPTION: &str = "ErrorException";
pub const ERROR_MESSAGE: &str = "ErrorMessage";
pub const RESPONSE_CONTENT: &str = "ResponseContent";
pub const CONTENT_TYPE: &str = "ContentType";
pub const CONTENT_LENGTH: &str = "ContentLength";
pub const RESPONSE_HEADERS: &str = "ResponseHeaders";
pub const ELAPSED_MILLISECONDS: &str = "ElapsedMilliseconds";
pub const VERSION: &str = "Version";
pub const CONTROLLER: &str = "Controller";
pub const OPERATION: &str = "Operation";

/// Names an additional-info pair may not overwrite.
pub const BUILT_IN: &[&str] = &[
    METHOD,
    PATH,
    HOST,
    PORT,
    URL_BASE,
    QUERY,
    QUERY_STRING,
    REQUEST_HEADERS,
    REQUEST_BODY,
    IP,
    REQUEST_KEY,
    ACCOUNT_ID,
    IS_SUCCESSFUL,
    STATUS_CODE,
    STATUS_DESCRIPTION,
    STATUS_CODE_FAMILY,
    PROTOCOL_VERSION,
    ERROR_EXCEPTION,
    ERROR_MESSAGE,
    RESPONSE_CONTENT,
    CONTENT_TYPE,
    CONTENT_LENGTH,
    RESPONSE_HEADERS,
    ELAPSED_MILLISECONDS,
    VERSION,
    CONTROLLER,
    OPERATION,
];
