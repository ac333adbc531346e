use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers the failure modes of introspecting a foreign IL2CPP process: rejected
/// handle construction, undecodable metadata, failed foreign-memory reads and runtime
/// lifecycle errors. Unrecognized storage-kind codes are deliberately *not* represented
/// here - the decoder and the native-alias resolver degrade gracefully instead of failing
/// (see [`crate::typesystem::ElementType::from_raw`] and
/// [`crate::typesystem::NativeAlias`]).
///
/// # Error Categories
///
/// ## Handle Errors
/// - [`Error::NullHandle`] - Construction was attempted from a null foreign address
/// - [`Error::RuntimeDetached`] - A descriptor outlived the [`crate::runtime::Runtime`] it was created from
///
/// ## Foreign Metadata Errors
/// - [`Error::Malformed`] - Corrupted or undecodable metadata in the target process
/// - [`Error::MemoryRead`] - A read against foreign memory failed
///
/// ## Resolution Errors
/// - [`Error::RecursionLimit`] - Maximum value-type flattening depth exceeded
#[derive(Error, Debug)]
pub enum Error {
    /// Construction was attempted from a null (zero) foreign address.
    ///
    /// The foreign API defines null as a legitimate outcome only for queries whose
    /// contract says so (e.g. the element type of a non-array type, which surfaces as
    /// `None` instead). Everywhere else a zero address is a usage error and handle
    /// construction rejects it. The payload names the handle type that was refused.
    #[error("Null address passed for '{0}'!")]
    NullHandle(&'static str),

    /// The metadata of the target process is damaged and could not be decoded.
    ///
    /// This error indicates broken foreign metadata - for example a type name that is
    /// not valid UTF-8, or a field enumeration yielding a null entry. A broken target
    /// is not a recoverable local condition, so this is fatal for the operation.
    /// The error includes the source location where the malformation was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A read against foreign process memory failed.
    ///
    /// Raised by [`crate::runtime::RuntimeApi`] implementations when the target address
    /// cannot be read - typically because the target process exited or the address is
    /// not mapped.
    #[error("Could not read foreign memory at 0x{address:016x}!")]
    MemoryRead {
        /// The foreign address that could not be read
        address: u64,
    },

    /// A descriptor was used after its [`crate::runtime::Runtime`] was dropped.
    ///
    /// Descriptors hold weak references to the runtime that created them; once the
    /// runtime is gone there is no API left to query through.
    #[error("Runtime has been detached!")]
    RuntimeDetached,

    /// Exceeded the maximum recursion depth during value-type flattening.
    ///
    /// A degenerate self-referential value-type graph cannot occur in valid metadata,
    /// but the resolver bounds its recursion rather than overflowing the stack on a
    /// corrupt target. The limit is [`crate::runtime::RuntimeConfig::max_value_type_depth`].
    #[error("Maximum recursion depth reached: {0}")]
    RecursionLimit(usize),
}
