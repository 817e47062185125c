// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Linking runs from model documents and graph documents to the output graph.

use std::path::PathBuf;

use ifc_linkset_graph::{Graph, Namespaces, Term, Vocabulary};
use ifc_linkset_model::{Element, GroupAssignment, Level, ModelDocument, RawMesh, System};
use ifc_linkset_processing::{
    BatchCoordinator, BatchInputs, Diagnostic, GraphLinker, LinkConfig,
};

const SYSTEM: &str = "1hOSvn6df7F8_7GcBWlRGQ";
const DUCT: &str = "2O2Fr$t4X7Zf8NOew3FLOH";
const TERMINAL: &str = "0M6o7Znnv7hxsbWgeu7oQq";
const SPACE: &str = "3vB2YO$MX4xv5uCqZZG05x";
const CORRIDOR: &str = "1kTvXnbbzCWw8lcMd1dR4o";

const PREFIXES: &str = "\
@prefix inst: <https://lbd.example.com/> .
@prefix props: <http://lbd.arch.rwth-aachen.de/props#> .
@prefix bot: <https://w3id.org/bot#> .
";

/// Box with top and bottom faces, `size` wide, from `z0` to `z1`.
fn slab(x: f64, y: f64, size: f64, z0: f64, z1: f64) -> RawMesh {
    let (x1, y1) = (x + size, y + size);
    RawMesh::new(
        vec![
            x, y, z0, x1, y, z0, x1, y1, z0, x, y1, z0, //
            x, y, z1, x1, y, z1, x1, y1, z1, x, y1, z1,
        ],
        vec![0, 2, 1, 0, 3, 2, 4, 5, 6, 4, 6, 7],
    )
}

fn hvac_model(members: &[&str]) -> ModelDocument {
    let mut level = Level::new("L01", 3000.0);
    level.contains = vec![DUCT.into(), TERMINAL.into()];

    ModelDocument::new(
        vec![
            Element::new(DUCT, "IfcDuctSegment")
                .with_ancestors(["IfcFlowSegment"])
                .with_mesh(slab(0.0, 0.0, 1.0, 5.5, 5.8)),
            Element::new(TERMINAL, "IfcAirTerminal")
                .with_ancestors(["IfcFlowTerminal"])
                .with_mesh(slab(1.0, 1.0, 0.6, 5.6, 5.9)),
        ],
        vec![level],
        vec![System {
            global_id: SYSTEM.into(),
            local_id: 4021,
            name: Some("Supply air".into()),
            description: Some("AHU-1 supply".into()),
        }],
        vec![GroupAssignment {
            group: SYSTEM.into(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }],
    )
    .unwrap()
}

fn hvac_graph() -> String {
    format!(
        "{PREFIXES}
inst:duct_1 props:globalIdIfcRoot_attribute_simple \"{DUCT}\" .
inst:terminal_1 props:globalIdIfcRoot_attribute_simple \"{TERMINAL}\" .
inst:ifcsystem_1 props:globalIdIfcRoot_attribute_simple \"{SYSTEM}\" .
"
    )
}

fn architecture_model() -> ModelDocument {
    let mut level = Level::new("Level 1", 3000.4);
    level.aggregates = vec![SPACE.into(), CORRIDOR.into()];

    ModelDocument::new(
        vec![
            Element::new(SPACE, "IfcSpace")
                .with_name("A101")
                .with_mesh(slab(0.0, 0.0, 4.0, 3.0, 6.0)),
            Element::new(CORRIDOR, "IfcSpace")
                .with_name("Corridor")
                .with_mesh(slab(4.0, 0.0, 4.0, 3.0, 6.0)),
        ],
        vec![level],
        Vec::new(),
        Vec::new(),
    )
    .unwrap()
}

fn architecture_graph() -> String {
    format!(
        "{PREFIXES}
inst:space_a101 a bot:Space ;
    props:globalIdIfcRoot_attribute_simple \"{SPACE}\" .
inst:space_corridor a bot:Space ;
    props:globalIdIfcRoot_attribute_simple \"{CORRIDOR}\" .
"
    )
}

fn node(local: &str) -> Term {
    Namespaces::default().inst(local)
}

#[test]
fn system_with_two_members() {
    let vocab = Vocabulary::default();
    let linker = GraphLinker::new(vocab.clone());
    let model = hvac_model(&[DUCT, TERMINAL]);
    let members = Graph::parse_turtle(&hvac_graph()).unwrap();
    let mut output = vocab.namespaces.new_graph();

    let systems = linker.add_system_instances(&mut output, &model);
    let linked = linker.link_system_members(&mut output, &model, &members);

    let system_nodes: Vec<&Term> = output
        .subjects_with(&vocab.rdf_type, &vocab.system_class)
        .collect();
    assert_eq!(system_nodes.len(), 1);
    let system = system_nodes[0].clone();

    assert_eq!(output.count_with_predicate(&vocab.has_part), 2);
    assert!(output.contains(&system, &vocab.has_part, &node("duct_1")));
    assert!(output.contains(&system, &vocab.has_part, &node("terminal_1")));
    assert_eq!(output.count_with_predicate(&vocab.same_as), 1);
    assert!(output.contains(&system, &vocab.same_as, &node("ifcSystem_4021")));
    assert!(systems.diagnostics.is_empty());
    assert!(linked.diagnostics.is_empty());
}

#[test]
fn unresolved_member_does_not_block_siblings() {
    const GHOST: &str = "0000000000000000000042";
    let vocab = Vocabulary::default();
    let linker = GraphLinker::new(vocab.clone());
    let model = hvac_model(&[DUCT, GHOST, TERMINAL]);
    let members = Graph::parse_turtle(&hvac_graph()).unwrap();
    let mut output = vocab.namespaces.new_graph();

    linker.add_system_instances(&mut output, &model);
    let linked = linker.link_system_members(&mut output, &model, &members);

    assert_eq!(linked.added, 2);
    assert_eq!(linked.diagnostics.len(), 1);
    assert!(matches!(
        linked.diagnostics.iter().next(),
        Some(Diagnostic::UnresolvedMember { member, .. }) if member == GHOST
    ));
}

#[test]
fn linking_twice_adds_nothing() {
    let vocab = Vocabulary::default();
    let linker = GraphLinker::new(vocab.clone());
    let model = hvac_model(&[DUCT, TERMINAL]);
    let members = Graph::parse_turtle(&hvac_graph()).unwrap();
    let mut output = vocab.namespaces.new_graph();

    linker.add_system_instances(&mut output, &model);
    linker.link_system_members(&mut output, &model, &members);
    let len = output.len();

    let systems = linker.add_system_instances(&mut output, &model);
    let linked = linker.link_system_members(&mut output, &model, &members);

    assert_eq!(output.len(), len);
    assert_eq!(systems.added + linked.added, 0);
    assert_eq!(linked.already_present, 2);
}

struct Workspace {
    root: PathBuf,
}

impl Workspace {
    fn new(name: &str) -> Self {
        let root =
            std::env::temp_dir().join(format!("linkset-e2e-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("models")).unwrap();
        std::fs::create_dir_all(root.join("graphs")).unwrap();
        std::fs::create_dir_all(root.join("arch")).unwrap();
        Self { root }
    }

    fn write(&self, relative: &str, contents: &str) {
        std::fs::write(self.root.join(relative), contents).unwrap();
    }

    fn inputs(&self) -> BatchInputs {
        BatchInputs {
            model_dir: self.root.join("models"),
            graph_dir: self.root.join("graphs"),
            target_model: self.root.join("arch/ARK.json"),
            target_graph: self.root.join("arch/ARK.ttl"),
            output: self.root.join("out/linkset.ttl"),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

#[test]
fn batch_run_links_systems_and_spaces() {
    let ws = Workspace::new("batch");
    ws.write(
        "models/HVAC.json",
        &serde_json::to_string(&hvac_model(&[DUCT, TERMINAL])).unwrap(),
    );
    ws.write("graphs/HVAC.ttl", &hvac_graph());
    ws.write("models/ELEC.json", "{}");
    ws.write("arch/ARK.json", &serde_json::to_string(&architecture_model()).unwrap());
    ws.write("arch/ARK.ttl", &architecture_graph());

    let mut batch = BatchCoordinator::new(LinkConfig::default(), Namespaces::default());
    let report = batch.run(&ws.inputs()).unwrap();

    assert_eq!(report.pairs_processed, 1);
    assert_eq!(report.missing_graph, 1);
    assert_eq!(report.systems, 1);
    assert_eq!(report.members_linked, 2);
    // the terminal sits in A101; the duct is not a source type
    assert_eq!(report.spaces_linked, 1);
    assert_eq!(report.pairs[0].matches, 1);
    assert_eq!(
        report
            .diagnostics
            .count(|d| matches!(d, Diagnostic::MissingGraphDocument { .. })),
        1
    );

    let vocab = Vocabulary::default();
    let saved = Graph::load(ws.root.join("out/linkset.ttl")).unwrap();
    assert_eq!(saved.len(), report.triples);
    assert!(saved.contains(&node("space_a101"), &vocab.has_element, &node("terminal_1")));
    assert_eq!(saved.count_with_predicate(&vocab.has_element), 1);
}

#[test]
fn batch_run_with_prefix_filter_and_tolerance() {
    let ws = Workspace::new("filter");
    // terminal hovering 5 cm above the corridor ceiling
    let mut level = Level::new("L01", 2999.6);
    level.contains = vec![TERMINAL.into()];
    let model = ModelDocument::new(
        vec![Element::new(TERMINAL, "IfcAirTerminal")
            .with_ancestors(["IfcFlowTerminal"])
            .with_mesh(slab(5.0, 1.0, 0.6, 6.05, 6.3))],
        vec![level],
        Vec::new(),
        Vec::new(),
    )
    .unwrap();
    ws.write("models/HVAC.json", &serde_json::to_string(&model).unwrap());
    ws.write("graphs/HVAC.ttl", &hvac_graph());
    ws.write("arch/ARK.json", &serde_json::to_string(&architecture_model()).unwrap());
    ws.write("arch/ARK.ttl", &architecture_graph());

    let strict = BatchCoordinator::new(LinkConfig::default(), Namespaces::default())
        .run(&ws.inputs())
        .unwrap();
    assert_eq!(strict.spaces_linked, 0);

    let tolerant = LinkConfig {
        tolerance_mm: 100.0,
        ..LinkConfig::default()
    };
    let report = BatchCoordinator::new(tolerant.clone(), Namespaces::default())
        .run(&ws.inputs())
        .unwrap();
    assert_eq!(report.spaces_linked, 1);

    // only names starting with a or b: the corridor is no longer a candidate
    let filtered = LinkConfig {
        target_prefixes: vec!['a', 'b'],
        ..tolerant
    };
    let report = BatchCoordinator::new(filtered, Namespaces::default())
        .run(&ws.inputs())
        .unwrap();
    assert_eq!(report.spaces_linked, 0);
}

#[test]
fn unreadable_target_graph_keeps_system_links() {
    let ws = Workspace::new("target");
    ws.write(
        "models/HVAC.json",
        &serde_json::to_string(&hvac_model(&[DUCT, TERMINAL])).unwrap(),
    );
    ws.write("graphs/HVAC.ttl", &hvac_graph());
    ws.write("arch/ARK.json", &serde_json::to_string(&architecture_model()).unwrap());
    ws.write("arch/ARK.ttl", "this is { not turtle");

    let mut batch = BatchCoordinator::new(LinkConfig::default(), Namespaces::default());
    let report = batch.run(&ws.inputs()).unwrap();

    assert_eq!(report.systems, 1);
    assert_eq!(report.members_linked, 2);
    assert_eq!(report.spaces_linked, 0);
    assert_eq!(
        report.diagnostics.count(
            |d| matches!(d, Diagnostic::DocumentLoad { path, .. } if path.ends_with("ARK.ttl"))
        ),
        1
    );

    let vocab = Vocabulary::default();
    let saved = Graph::load(ws.root.join("out/linkset.ttl")).unwrap();
    assert_eq!(saved.count_with_predicate(&vocab.has_part), 2);
    assert_eq!(saved.count_with_predicate(&vocab.has_element), 0);
}

#[test]
fn member_graph_with_blank_nodes_still_links() {
    let ws = Workspace::new("blank");
    ws.write(
        "models/HVAC.json",
        &serde_json::to_string(&hvac_model(&[DUCT, TERMINAL])).unwrap(),
    );
    ws.write(
        "graphs/HVAC.ttl",
        &format!("{}_:pset props:note \"x\" .\ninst:duct_1 props:pset _:pset .\n", hvac_graph()),
    );
    ws.write("arch/ARK.json", &serde_json::to_string(&architecture_model()).unwrap());
    ws.write("arch/ARK.ttl", &architecture_graph());

    let mut batch = BatchCoordinator::new(LinkConfig::default(), Namespaces::default());
    let report = batch.run(&ws.inputs()).unwrap();

    assert_eq!(report.pairs_processed, 1);
    assert_eq!(report.members_linked, 2);
    assert_eq!(report.spaces_linked, 1);
    assert_eq!(
        report
            .diagnostics
            .count(|d| matches!(d, Diagnostic::DocumentLoad { .. })),
        0
    );
}
