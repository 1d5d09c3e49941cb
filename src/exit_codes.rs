//! Exit code constants for the crashrepro CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable config, I/O failure)
//! - 2: The executed command exited non-zero
//! - 3: A required binary is not installed
//! - 4: A process group could not be confirmed dead

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid config, or an I/O failure.
pub const USER_ERROR: i32 = 1;

/// The command ran and exited with a non-zero code.
pub const COMMAND_FAILURE: i32 = 2;

/// The binary (or gsutil) could not be found on the search path.
pub const NOT_INSTALLED: i32 = 3;

/// The kill sequence delivered every signal without the group going away.
pub const KILL_FAILURE: i32 = 4;
