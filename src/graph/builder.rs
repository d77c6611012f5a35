use crate::model::{Edge, Function, Module, Node, QUALIFIER_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How bare call names are matched against node ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resolution {
    /// Only nodes created earlier in the same pass (including the caller) are visible.
    /// A bare call to a function in a later module gets the caller's module prefix.
    #[default]
    TraversalOrder,
    /// Every node id is collected before any edge is resolved.
    WholeDataset,
}

/// `qualified_name -> Function`, populated during a build pass.
#[derive(Debug, Clone, Default)]
pub struct FunctionLookup {
    functions: HashMap<String, Function>,
}

impl FunctionLookup {
    pub fn get(&self, id: &str) -> Option<&Function> {
        self.functions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.functions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Qualified names of functions whose raw calls name `function`, either by
    /// its qualified name or by its bare name. Sorted.
    pub fn callers_of(&self, function: &Function) -> Vec<String> {
        let mut callers: Vec<String> = self
            .functions
            .values()
            .filter(|f| {
                f.calls
                    .iter()
                    .any(|c| *c == function.qualified_name || *c == function.name)
            })
            .map(|f| f.qualified_name.clone())
            .collect();
        callers.sort();
        callers
    }

    fn insert(&mut self, function: Function) {
        self.functions
            .insert(function.qualified_name.clone(), function);
    }
}

/// Output of one build pass: what the render engine draws plus the lookup the
/// detail pane reads from.
#[derive(Debug, Clone, Default)]
pub struct DiagramGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub lookup: FunctionLookup,
}

impl DiagramGraph {
    /// Edges whose target has no node.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .iter()
            .filter(move |e| !ids.contains(e.to.as_str()))
    }
}

pub fn build(modules: Vec<Module>) -> DiagramGraph {
    build_with(modules, Resolution::default())
}

pub fn build_with(modules: Vec<Module>, resolution: Resolution) -> DiagramGraph {
    let mut known: HashSet<String> = match resolution {
        Resolution::TraversalOrder => HashSet::new(),
        Resolution::WholeDataset => modules
            .iter()
            .flat_map(|m| m.functions.iter().map(|f| f.qualified_name.clone()))
            .collect(),
    };

    let mut graph = DiagramGraph::default();

    for module in modules {
        for function in module.functions {
            let id = function.qualified_name.clone();
            graph.nodes.push(Node::new(&id, &function.name));
            known.insert(id.clone());

            for call in &function.calls {
                let target = resolve_target(call, &module.name, &known);
                graph.edges.push(Edge::new(&id, target));
            }

            graph.lookup.insert(function);
        }
    }

    graph
}

/// Nodes whose id or label contains `term`, ignoring case, in node order.
pub fn search_nodes<'a>(nodes: &'a [Node], term: &str) -> Vec<&'a Node> {
    let term = term.to_lowercase();
    nodes
        .iter()
        .filter(|n| n.id.to_lowercase().contains(&term) || n.label.to_lowercase().contains(&term))
        .collect()
}

/// Resolve one call reference made from a function in `caller_module`.
///
/// Order matters: an exact id match wins, then anything already qualified is
/// kept verbatim, and a bare name is assumed to live in the caller's module.
pub fn resolve_target(call: &str, caller_module: &str, known: &HashSet<String>) -> String {
    if known.contains(call) || call.contains(QUALIFIER_SEPARATOR) {
        call.to_string()
    } else {
        format!("{}{}{}", caller_module, QUALIFIER_SEPARATOR, call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Module> {
        vec![
            Module::new("app")
                .with_function(
                    Function::new("app", "upload", 40)
                        .with_calls(["parse_codebase", "build_modules_json", "os.makedirs"]),
                )
                .with_function(Function::new("app", "build_modules_json", 16).with_calls(["dump"])),
            Module::new("code_parser")
                .with_function(Function::new("code_parser", "parse_codebase", 79)),
        ]
    }

    #[test]
    fn test_one_node_per_function_and_one_edge_per_call() {
        let graph = build(sample());

        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 4);
        assert_eq!(graph.lookup.len(), 3);

        let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["app.upload", "app.build_modules_json", "code_parser.parse_codebase"]
        );
        assert_eq!(graph.nodes[0].label, "upload");
    }

    #[test]
    fn test_bare_call_qualified_with_caller_module() {
        let graph = build(sample());
        let targets: Vec<_> = graph
            .edges
            .iter()
            .filter(|e| e.from == "app.upload")
            .map(|e| e.to.as_str())
            .collect();

        // parse_codebase lives in a later module, so it picks up the caller's prefix
        assert_eq!(
            targets,
            vec!["app.parse_codebase", "app.build_modules_json", "os.makedirs"]
        );
    }

    #[test]
    fn test_exact_match_of_earlier_node_is_kept_verbatim() {
        let modules = vec![
            Module::new("helpers").with_function(Function::new("helpers", "slugify", 1)),
            Module::new("views")
                .with_function(Function::new("views", "render", 3).with_calls(["helpers.slugify"])),
        ];
        let graph = build(modules);

        assert_eq!(graph.edges[0].to, "helpers.slugify");
        assert_eq!(graph.dangling_edges().count(), 0);
    }

    #[test]
    fn test_bare_name_equal_to_earlier_id_matches_identity() {
        // A node whose id has no separator is matched by identity before qualification.
        let mut main = Function::new("script", "main", 1);
        main.qualified_name = "main".to_string();
        let modules = vec![
            Module::new("script").with_function(main),
            Module::new("runner").with_function(Function::new("runner", "go", 1).with_calls(["main"])),
        ];
        let graph = build(modules);

        assert_eq!(graph.edges[0].to, "main");
    }

    #[test]
    fn test_self_call_resolves_to_own_node() {
        let modules = vec![Module::new("walk").with_function(
            Function::new("walk", "visit", 10).with_calls(["walk.visit", "visit"]),
        )];
        let graph = build(modules);

        assert_eq!(graph.edges[0].to, "walk.visit");
        assert_eq!(graph.edges[1].to, "walk.visit");
    }

    #[test]
    fn test_qualified_unresolved_call_is_dangling() {
        let modules = vec![Module::new("app").with_function(
            Function::new("app", "chat", 90).with_calls(["request.json.get", "jsonify"]),
        )];
        let graph = build(modules);

        let dangling: Vec<_> = graph.dangling_edges().map(|e| e.to.as_str()).collect();
        assert_eq!(dangling, vec!["request.json.get", "app.jsonify"]);
    }

    #[test]
    fn test_parallel_edges_are_not_deduplicated() {
        let modules = vec![Module::new("m").with_function(
            Function::new("m", "f", 1).with_calls(["g", "g", "m.g"]),
        )];
        let graph = build(modules);

        assert_eq!(graph.edges.len(), 3);
        assert!(graph.edges.iter().all(|e| e.to == "m.g"));
    }

    #[test]
    fn test_whole_dataset_sees_later_nodes() {
        let mut late = Function::new("b", "late", 1);
        late.qualified_name = "late".to_string();
        let modules = vec![
            Module::new("a").with_function(Function::new("a", "early", 1).with_calls(["late"])),
            Module::new("b").with_function(late),
        ];

        let traversal = build_with(modules.clone(), Resolution::TraversalOrder);
        let whole = build_with(modules, Resolution::WholeDataset);

        assert_eq!(traversal.edges[0].to, "a.late");
        assert_eq!(whole.edges[0].to, "late");
    }

    #[test]
    fn test_duplicate_ids_keep_every_node_and_last_lookup() {
        let modules = vec![
            Module::new("m").with_function(Function::new("m", "f", 1)),
            Module::new("m").with_function(Function::new("m", "f", 99)),
        ];
        let graph = build(modules);

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.lookup.len(), 1);
        assert_eq!(graph.lookup.get("m.f").map(|f| f.line_number), Some(99));
    }

    #[test]
    fn test_callers_match_qualified_or_bare_name() {
        let graph = build(vec![
            Module::new("app")
                .with_function(Function::new("app", "upload", 40).with_calls(["parse_codebase"]))
                .with_function(
                    Function::new("app", "reparse", 60).with_calls(["code_parser.parse_codebase"]),
                )
                .with_function(Function::new("app", "index", 10).with_calls(["render_template"])),
            Module::new("code_parser")
                .with_function(Function::new("code_parser", "parse_codebase", 79)),
        ]);
        let target = graph.lookup.get("code_parser.parse_codebase").unwrap();

        assert_eq!(graph.lookup.callers_of(target), vec!["app.reparse", "app.upload"]);

        let index = graph.lookup.get("app.index").unwrap();
        assert!(graph.lookup.callers_of(index).is_empty());
    }

    #[test]
    fn test_search_nodes_matches_id_or_label_case_insensitively() {
        let graph = build(sample());

        let ids: Vec<_> = search_nodes(&graph.nodes, "PARSE")
            .into_iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["code_parser.parse_codebase"]);

        let ids: Vec<_> = search_nodes(&graph.nodes, "app.")
            .into_iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["app.upload", "app.build_modules_json"]);

        assert_eq!(search_nodes(&graph.nodes, "").len(), graph.nodes.len());
        assert!(search_nodes(&graph.nodes, "kubernetes").is_empty());
    }

    #[test]
    fn test_empty_input() {
        let graph = build(Vec::new());
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
        assert!(graph.lookup.is_empty());
    }
}
