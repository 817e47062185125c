// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building systems and group assignments.

use serde::{Deserialize, Serialize};

/// A building system (`IfcSystem` and subtypes such as `IfcDistributionSystem`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    pub global_id: String,
    /// STEP instance id of the system in its source file (`#1234`).
    pub local_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One group assignment relationship (`IfcRelAssignsToGroup`).
///
/// `group` may reference a system or any other group; only assignments to
/// systems are linked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAssignment {
    pub group: String,
    #[serde(default)]
    pub members: Vec<String>,
}
