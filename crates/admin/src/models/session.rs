//! Session keys for admin state.

/// Session keys for admin data.
pub mod keys {
    /// Pending flash notifications.
    pub const FLASH: &str = "flash";

    /// Last submitted variant generator selection, restored on the next visit.
    pub const VARIANT_SELECTION: &str = "variant_selection";
}
