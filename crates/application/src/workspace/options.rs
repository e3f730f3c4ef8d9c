//! Insertion options.

/// Flags controlling the side effects of adding a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct AddOptions {
    /// Always append; never reuse an empty tab.
    pub skip_position_check: bool,
    /// Leave the selection untouched.
    pub no_auto_select: bool,
    /// Do not notify observers of the change.
    pub skip_update: bool,
    /// Do not schedule persistence.
    pub skip_store: bool,
}

impl AddOptions {
    /// Options for bulk loading a list of requests.
    #[must_use]
    pub const fn bulk() -> Self {
        Self {
            skip_position_check: true,
            no_auto_select: false,
            skip_update: true,
            skip_store: true,
        }
    }

    /// Returns a copy that appends instead of reusing an empty tab.
    #[must_use]
    pub const fn appending(mut self) -> Self {
        self.skip_position_check = true;
        self
    }

    /// Returns a copy that keeps the current selection.
    #[must_use]
    pub const fn without_select(mut self) -> Self {
        self.no_auto_select = true;
        self
    }
}
