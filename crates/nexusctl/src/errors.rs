//! Error codes and exit status for nexusctl

use nexus_common::DiagError;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code for missing or invalid input and configuration
pub const EXIT_INVALID_INPUT: i32 = 2;

/// Exit code when the switch could not be reached or returned nothing
pub const EXIT_SWITCH_UNAVAILABLE: i32 = 69;

/// Exit code when the language model request failed
pub const EXIT_ANALYSIS_FAILED: i32 = 70;

/// Exit code when the diagnostic record could not be read or written
pub const EXIT_IO_ERROR: i32 = 74;

/// Map any error reaching main to a process exit code
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<DiagError>())
        .map(DiagError::exit_code)
        .unwrap_or(EXIT_GENERAL_ERROR)
}
