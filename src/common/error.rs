use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ClientErrorCode {
    // unknown error
    UnknownError = 1000,
    // http request error
    HttpError = 1001,
    // response payload format error
    PayloadError = 1002,
    // config file error
    ConfigError = 1003,
    // network interface scan error
    NetScanError = 1004,
    // local identity cache error
    IdCacheError = 1005,
}

#[derive(Debug)]
pub struct TerminalClientError {
    pub code: ClientErrorCode,
    pub msg: String,
}

impl Display for TerminalClientError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "terminal client error code: {}, msg: {}", self.code as u16, self.msg)
    }
}

impl Error for TerminalClientError {}
