//! Error macros for recap

/// Macro for creating invalid value errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::RecapError::invalid_value($context, $value))
    };
}

/// Macro for creating usage errors
#[macro_export]
macro_rules! bail_usage {
    ($msg:expr) => {
        return Err($crate::error::RecapError::UsageError($msg.to_string()))
    };
}

/// Macro for rejecting a model response that could not be parsed
#[macro_export]
macro_rules! bail_parse {
    ($what:expr, $response:expr) => {
        return Err($crate::error::RecapError::parse($what, $response))
    };
}
