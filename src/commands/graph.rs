use crate::cli::GraphArgs;
use crate::client::{DiagramSource, FileSource, HttpClient};
use crate::fs::{FileSystem, default_fs};
use crate::graph::{
    CanvasPoint, RenderEngine, ScreenPoint, StaticLayout, VisDataset, search_nodes,
};
use crate::interaction::{Controller, ControllerOptions, PointerClick, Selection};
use crate::model::{Edge, Node};
use crate::style;
use std::path::Path;

use super::{CommandContext, runtime};

/// Feeds one load to both the exportable dataset and a positioned layout.
struct ExportingLayout {
    dataset: VisDataset,
    layout: StaticLayout,
}

impl RenderEngine for ExportingLayout {
    fn load(&mut self, nodes: &[Node], edges: &[Edge]) {
        self.dataset.load(nodes, edges);
        self.layout.load(nodes, edges);
    }

    fn node_position(&self, id: &str) -> Option<CanvasPoint> {
        self.layout.node_position(id)
    }

    fn canvas_to_dom(&self, point: CanvasPoint) -> ScreenPoint {
        self.layout.canvas_to_dom(point)
    }
}

pub fn cmd_graph(args: GraphArgs) -> i32 {
    let ctx = match CommandContext::new(Path::new(".")) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let engine = ExportingLayout {
        dataset: VisDataset::default(),
        layout: StaticLayout::new(1280.0, 800.0),
    };
    let mut controller = Controller::new(
        engine,
        ControllerOptions {
            offset: ctx.config.pane_offset,
            resolution: ctx.config.resolution,
        },
    );

    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    let fs = default_fs();
    let loaded = match &args.input {
        Some(input) => rt.block_on(load(&mut controller, &FileSource::new(input, fs))),
        None => {
            let base_url = args.url.clone().unwrap_or(ctx.config.client.base_url);
            rt.block_on(load(&mut controller, &HttpClient::new(&base_url)))
        }
    };
    if !loaded {
        style::hint("Start a server with `callmap serve <path>` or pass --input <modules.json>");
        return 1;
    }

    print_summary(controller.engine());

    if let Some(term) = &args.search {
        print_matches(&controller.engine().dataset, term);
    }

    if let Some(export_path) = &args.export {
        if let Err(code) = export(&controller.engine().dataset, export_path, fs) {
            return code;
        }
    }

    if let Some(id) = &args.select {
        controller.dispatch(&PointerClick::on_node(id));
        match controller.selection() {
            Some(selection) => print_selection(selection),
            None => {
                style::warning(&format!("No function data for node `{}`", id));
                return 1;
            }
        }
    }

    0
}

async fn load<S: DiagramSource>(controller: &mut Controller<ExportingLayout>, source: &S) -> bool {
    match controller.load_diagram(source).await {
        Ok(_) => true,
        Err(e) => {
            style::error(&format!("Could not load diagram data: {}", e));
            false
        }
    }
}

fn export(dataset: &VisDataset, path: &Path, fs: &dyn FileSystem) -> Result<(), i32> {
    if let Err(e) = crate::fs::write_json(fs, path, dataset) {
        style::error(&format!("Failed to write export file: {}", e));
        return Err(1);
    }
    style::success(&format!("Graph exported to: {}", style::path(path)));
    Ok(())
}

fn print_summary(engine: &ExportingLayout) {
    let edges = engine.dataset.edges.len();
    let drawn = engine.layout.drawn_edge_count();

    style::section("Call graph");
    println!("{}", style::metric("nodes", engine.dataset.nodes.len()));
    println!("{}", style::metric("edges", edges));
    println!("{}", style::metric("dangling edges", edges - drawn));
}

fn print_matches(dataset: &VisDataset, term: &str) {
    let matches = search_nodes(&dataset.nodes, term);

    style::section(&format!("Functions matching `{}` ({})", term, matches.len()));
    for node in matches {
        println!("  {} ({})", node.id, node.label);
    }
}

fn print_selection(selection: &Selection) {
    let view = &selection.view;

    style::section(&view.identifier);
    println!("{}", style::metric("location", &view.location));
    println!("{}", style::metric("parameters", &view.parameters));
    println!("{}", style::metric("description", &view.description));
    if let Some(pos) = selection.position {
        println!("{}", style::metric("pane at", format!("({:.0}, {:.0})", pos.x, pos.y)));
    }
    println!("  calls:");
    for call in &view.calls {
        println!("    - {}", call);
    }
    println!("  called by:");
    if view.callers.is_empty() {
        println!("    - none");
    }
    for caller in &view.callers {
        println!("    - {}", caller);
    }
}
