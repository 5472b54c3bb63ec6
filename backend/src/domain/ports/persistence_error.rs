//! Error type shared by every repository port.

use super::define_port_error;

define_port_error! {
    /// Failures raised by repository adapters.
    pub enum PersistenceError {
        /// The store could not be reached or no connection was available.
        Connection { message: String } => "repository connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "repository query failed: {message}",
        /// A unique constraint rejected the write.
        Duplicate { message: String } => "unique constraint violated: {message}",
        /// A foreign key pointed at a row that no longer exists.
        MissingReference { message: String } => "referenced row is missing: {message}",
    }
}
