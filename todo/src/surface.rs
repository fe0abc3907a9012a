//! Host surface contract.

use crate::types::Filter;
use crate::view::ListView;
use std::io;

/// Host UI the controller draws into
///
/// Every method replaces what was shown before; the controller calls all of
/// them after each event, so implementations keep no diffing logic.
pub trait Surface {
    /// Replace the list container contents
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the surface cannot be written.
    fn render_list(&mut self, list: &ListView) -> io::Result<()>;

    /// Replace the remaining-count label
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the surface cannot be written.
    fn set_remaining(&mut self, label: &str) -> io::Result<()>;

    /// Mark exactly one filter control as active
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the surface cannot be written.
    fn set_active_filter(&mut self, filter: Filter) -> io::Result<()>;

    /// Empty the text-entry field
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the surface cannot be written.
    fn clear_input(&mut self) -> io::Result<()>;
}
