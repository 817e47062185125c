// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grouping elements by building storey.

use ifc_linkset_model::{Element, ModelSource};

/// Rounds a storey elevation half-up to whole model units.
///
/// Storeys from different models are matched on this value only, so
/// `"Level 1"` at 3000.4 and `"L01"` at 2999.6 are the same storey.
#[inline]
pub fn round_elevation(elevation: f64) -> i64 {
    (elevation + 0.5).floor() as i64
}

/// Identity of a storey group. Matching uses `elevation` only; `name` is
/// kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreyKey {
    pub name: String,
    pub elevation: i64,
}

/// Elements of the requested types found on one storey.
#[derive(Debug, Clone)]
pub struct StoreyGroup<'a> {
    pub key: StoreyKey,
    pub elements: Vec<&'a Element>,
}

/// Groups elements of `type_tags` by the storey that contains or aggregates
/// them.
///
/// Levels are visited in model order. For each tag, contained elements come
/// before aggregated ones. An element reachable twice (or matching two tags)
/// appears twice. Levels without matching elements are left out.
pub fn map_elements_to_storeys<'a, M>(model: &'a M, type_tags: &[String]) -> Vec<StoreyGroup<'a>>
where
    M: ModelSource + ?Sized,
{
    let mut groups = Vec::new();

    for level in model.levels() {
        let mut elements = Vec::new();
        for tag in type_tags {
            elements.extend(
                level
                    .contains
                    .iter()
                    .chain(&level.aggregates)
                    .filter_map(|id| model.element(id))
                    .filter(|element| element.is_a(tag)),
            );
        }

        if elements.is_empty() {
            continue;
        }

        let key = StoreyKey {
            name: level.name.clone(),
            elevation: round_elevation(level.elevation),
        };
        tracing::debug!(
            storey = %key.name,
            elevation = key.elevation,
            elements = elements.len(),
            "Grouped storey"
        );
        groups.push(StoreyGroup { key, elements });
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_linkset_model::{Level, ModelDocument};

    fn model() -> ModelDocument {
        let mut ground = Level::new("Ground", 0.2);
        ground.contains = vec!["duct".into(), "vav".into(), "wall".into()];
        ground.aggregates = vec!["space".into()];

        let mut first = Level::new("Level 1", 2999.5);
        first.contains = vec!["terminal".into(), "terminal".into()];

        let empty = Level::new("Roof", 6000.0);

        ModelDocument::new(
            vec![
                Element::new("duct", "IfcFlowSegment"),
                Element::new("vav", "IfcDamper")
                    .with_ancestors(["IfcFlowController", "IfcDistributionFlowElement"]),
                Element::new("wall", "IfcWall"),
                Element::new("space", "IfcSpace"),
                Element::new("terminal", "IfcAirTerminal").with_ancestors(["IfcFlowTerminal"]),
            ],
            vec![ground, first, empty],
            Vec::new(),
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_elevation(2999.5), 3000);
        assert_eq!(round_elevation(2999.49), 2999);
        assert_eq!(round_elevation(-0.5), 0);
        assert_eq!(round_elevation(-1.6), -2);
    }

    #[test]
    fn groups_by_level_with_subtypes() {
        let model = model();
        let tags = vec!["IfcFlowTerminal".to_string(), "IfcFlowController".to_string()];
        let groups = map_elements_to_storeys(&model, &tags);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key.name, "Ground");
        assert_eq!(groups[0].key.elevation, 0);
        let ids: Vec<&str> = groups[0].elements.iter().map(|e| e.global_id.as_str()).collect();
        assert_eq!(ids, ["vav"]);

        assert_eq!(groups[1].key.elevation, 3000);
        assert_eq!(groups[1].elements.len(), 2, "repeats are kept");
    }

    #[test]
    fn aggregated_elements_are_found() {
        let model = model();
        let groups = map_elements_to_storeys(&model, &["IfcSpace".to_string()]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].elements[0].global_id, "space");
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut level = Level::new("Ground", 0.0);
        level.contains = vec!["missing".into()];
        let model = ModelDocument::new(Vec::new(), vec![level], Vec::new(), Vec::new()).unwrap();
        assert!(map_elements_to_storeys(&model, &["IfcSpace".to_string()]).is_empty());
    }
}
