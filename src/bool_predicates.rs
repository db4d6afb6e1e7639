//! Serde predicates for boolean CLI flags.

/// Returns `true` when `value` is `false`.
///
/// Used by `skip_serializing_if` so an unset `--pretty` flag does not shadow
/// values from the environment or a config file.
#[must_use]
#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes skip predicates by reference"
)]
pub fn not(value: &bool) -> bool {
    !*value
}
