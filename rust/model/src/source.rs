// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The read-only interface every model back-end provides.

use crate::element::{Element, Level};
use crate::system::{GroupAssignment, System};

/// Read access to a loaded building model.
pub trait ModelSource {
    /// Looks up an element by GlobalId.
    fn element(&self, global_id: &str) -> Option<&Element>;

    /// Returns all elements that are of (or derive from) any of `type_tags`.
    fn elements_of_type(&self, type_tags: &[String]) -> Vec<&Element>;

    /// Building storeys in model order.
    fn levels(&self) -> &[Level];

    fn systems(&self) -> &[System];

    fn group_assignments(&self) -> &[GroupAssignment];

    /// Looks up a system by GlobalId.
    fn system(&self, global_id: &str) -> Option<&System> {
        self.systems().iter().find(|s| s.global_id == global_id)
    }
}
