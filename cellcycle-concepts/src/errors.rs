use core::fmt::Display;
use std::error::Error;

macro_rules! define_errors {
    ($(($err_name: ident, $err_descr: expr)),+) => {
        $(
            #[doc = $err_descr]
            #[derive(Debug, Clone, PartialEq)]
            pub struct $err_name(
                #[doc = "Error message associated with "]
                #[doc = stringify!($err_name)]
                #[doc = " error type."]
                pub String,
            );

            impl Display for $err_name {
                fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl Error for $err_name {}
        )+
    }
}

define_errors!(
    (
        ConfigurationError,
        "A required parameter of a cell-cycle model was used before it was set"
    ),
    (
        InvariantError,
        "Internal contract of a cell-cycle model was violated, eg. an update before birth"
    ),
    (
        RequestError,
        "Ask a cell for information it does not carry and receive this error"
    ),
    (
        RngError,
        "Can occur when generating distributions or drawing samples from them."
    ),
    (
        TimeError,
        "Error related to advancing the simulation time or displaying its progress"
    ),
    (DivisionError, "Errors related to a cell dividing process"),
    (SetupError, "Occurs during setup of a new simulation")
);

/// Any error which can be returned while updating, initialising or dividing a cell-cycle model.
#[derive(Clone, Debug, PartialEq)]
pub enum CycleError {
    /// See [ConfigurationError]
    Configuration(ConfigurationError),
    /// See [InvariantError]
    Invariant(InvariantError),
    /// See [RequestError]
    Request(RequestError),
    /// See [RngError]
    Rng(RngError),
    /// See [DivisionError]
    Division(DivisionError),
}

impl Display for CycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CycleError::Configuration(e) => write!(f, "configuration error: {e}"),
            CycleError::Invariant(e) => write!(f, "invariant violated: {e}"),
            CycleError::Request(e) => write!(f, "request error: {e}"),
            CycleError::Rng(e) => write!(f, "rng error: {e}"),
            CycleError::Division(e) => write!(f, "division error: {e}"),
        }
    }
}

impl Error for CycleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CycleError::Configuration(e) => Some(e),
            CycleError::Invariant(e) => Some(e),
            CycleError::Request(e) => Some(e),
            CycleError::Rng(e) => Some(e),
            CycleError::Division(e) => Some(e),
        }
    }
}

macro_rules! impl_from_for_cycle_error {
    ($(($err_name:ident, $variant:ident)),+) => {
        $(
            impl From<$err_name> for CycleError {
                fn from(value: $err_name) -> Self {
                    CycleError::$variant(value)
                }
            }
        )+
    }
}

impl_from_for_cycle_error!(
    (ConfigurationError, Configuration),
    (InvariantError, Invariant),
    (RequestError, Request),
    (RngError, Rng),
    (DivisionError, Division)
);

impl From<String> for TimeError {
    fn from(value: String) -> Self {
        TimeError(value)
    }
}

/// For internal use: formats an error message to include a link to the bug tracker.
#[macro_export]
macro_rules! format_error_message(
    (@function) => {
        {
            fn f() {}
            let name = std::any::type_name_of_val(&f);
            name.strip_suffix("::f").unwrap_or(name)
        }
    };
    ($bug_title:expr, $error_msg:expr) => {
        {
            let title = $bug_title.replace(" ", "%20");
            let mut body = String::from($error_msg);
            body = body + &format!("%0A%0AFile: {}", file!());
            body = body + &format!("%0ALine: {}", line!());
            body = body.replace(" ", "%20");
            format!("Internal Error in function {} of file {}: +++ {} +++ Please file a \
                bug-report with title={} and body={}",
                $crate::format_error_message!(@function),
                file!(),
                $error_msg,
                title,
                body,
            )
        }
    };
);
