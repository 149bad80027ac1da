use std::collections::BTreeMap;
use std::io::Read;

use ermine_core::geom::{Point, Rect, point, rect};
use ermine_core::{
    Diagram, LayoutEngine, LayoutSpacing, NodeId, RelAnchors, SizedNode, assign_anchors,
    compute_layout, layout::estimate_size, parse_document, parse_entity_command,
    parse_relationship_command, serialize_document, ANCHOR_GAP,
};
use serde::Serialize;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(ermine_core::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ermine_core::Error> for CliError {
    fn from(value: ermine_core::Error) -> Self {
        Self::Core(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Parse,
    Fmt,
    Command,
    Layout,
}

#[derive(Debug)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    raw: bool,
    with_anchors: bool,
    gap: f64,
    at: Point,
    command_kind: Option<String>,
    command_text: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "ermine-cli\n\
\n\
USAGE:\n\
  ermine-cli [parse] [--pretty] [--raw] [<path>|-]\n\
  ermine-cli fmt [--out <path>] [<path>|-]\n\
  ermine-cli command <en|rel> <text...>\n\
  ermine-cli layout [--pretty] [--at <x,y>] [--anchors] [--gap <n>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - parse prints the derived JSON model; --raw skips structural derivation.\n\
  - fmt re-serializes the document (derived elements are never persisted).\n\
  - command parses one strict entity (en) or relationship (rel) command.\n\
  - layout prints world positions centered on --at (default 0,0); --anchors\n\
    adds per-relationship anchor sides and offsets.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Parse,
        input: None,
        pretty: false,
        raw: false,
        with_anchors: false,
        gap: ANCHOR_GAP,
        at: point(0.0, 0.0),
        command_kind: None,
        command_text: None,
        out: None,
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "fmt" => args.command = Command::Fmt,
            "layout" => args.command = Command::Layout,
            "command" => {
                args.command = Command::Command;
                let Some(kind) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.command_kind = Some(kind.clone());
                let rest: Vec<String> = it.by_ref().cloned().collect();
                if !rest.is_empty() {
                    args.command_text = Some(rest.join(" "));
                }
            }
            "--pretty" => args.pretty = true,
            "--raw" => args.raw = true,
            "--anchors" => args.with_anchors = true,
            "--gap" => {
                let Some(gap) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.gap = gap.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--at" => {
                let Some(at) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let Some((x, y)) = at.split_once(',') else {
                    return Err(CliError::Usage(usage()));
                };
                let x = x.trim().parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                let y = y.trim().parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                args.at = point(x, y);
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            println!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

/// Adapts the stoat layered engine to the core's layout capability.
struct LayeredEngine;

impl LayoutEngine for LayeredEngine {
    fn layout(
        &self,
        nodes: &[SizedNode],
        edges: &[(usize, usize)],
        spacing: LayoutSpacing,
    ) -> Vec<Point> {
        let mut g = stoat::Graph::new(stoat::Config {
            nodesep: spacing.nodesep,
            ranksep: spacing.ranksep,
            marginx: spacing.marginx,
            marginy: spacing.marginy,
        });
        for node in nodes {
            g.add_node(node.id.as_str(), node.width, node.height);
        }
        for &(a, b) in edges {
            g.add_edge(nodes[a].id.as_str(), nodes[b].id.as_str());
        }
        stoat::layout(&mut g);

        nodes
            .iter()
            .map(|node| {
                g.node(node.id.as_str())
                    .and_then(|n| n.x.zip(n.y))
                    .map_or(point(0.0, 0.0), |(x, y)| point(x, y))
            })
            .collect()
    }
}

#[derive(Serialize)]
struct PlacedNode<'a> {
    id: &'a str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    positions: Vec<PlacedNode<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    anchors: Option<BTreeMap<usize, RelAnchors>>,
}

fn load_diagram(text: &str) -> Diagram {
    let raw = parse_document(text);
    Diagram::load(raw.entities, raw.relationships)
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Parse => {
            let text = read_input(args.input.as_deref())?;
            let diagram = if args.raw {
                parse_document(&text)
            } else {
                load_diagram(&text)
            };
            write_json(&diagram, args.pretty)
        }
        Command::Fmt => {
            let text = read_input(args.input.as_deref())?;
            let diagram = parse_document(&text);
            let code = serialize_document(&diagram.entities, &diagram.relationships);
            write_text(&code, args.out.as_deref())
        }
        Command::Command => {
            let kind = args.command_kind.as_deref().unwrap_or_default();
            let text = match args.command_text {
                Some(text) => text,
                None => read_input(None)?,
            };
            match kind {
                "en" => write_json(&parse_entity_command(&text)?, args.pretty),
                "rel" => write_json(&parse_relationship_command(&text)?, args.pretty),
                _ => Err(CliError::Usage(usage())),
            }
        }
        Command::Layout => {
            let text = read_input(args.input.as_deref())?;
            let diagram = load_diagram(&text);
            let positions = compute_layout(
                &diagram.entities,
                &diagram.relationships,
                args.at,
                &LayeredEngine,
            );

            let mut placed = Vec::with_capacity(diagram.entities.len());
            let mut ids = Vec::with_capacity(diagram.entities.len());
            for (entity, pos) in diagram.entities.iter().zip(&positions) {
                let (width, height) = estimate_size(entity);
                ids.push(entity.node_id());
                placed.push((pos, width, height));
            }

            let anchors = if args.with_anchors {
                // Anchor sides are classified in screen space; the
                // application convention is screen = middle + camera - world,
                // so the world offsets flip sign.
                let boxes: std::collections::HashMap<NodeId, Rect> = ids
                    .iter()
                    .zip(&placed)
                    .map(|(id, &(pos, width, height))| {
                        let x = args.at.x - pos.x;
                        let y = args.at.y - pos.y;
                        (
                            id.clone(),
                            rect(x - width / 2.0, y - height / 2.0, width, height),
                        )
                    })
                    .collect();
                let lookup = |id: &NodeId| boxes.get(id).copied();
                let assigned = assign_anchors(&diagram.relationships, &lookup, args.gap);
                Some(assigned.into_iter().collect::<BTreeMap<_, _>>())
            } else {
                None
            };

            let out = LayoutOut {
                positions: ids
                    .iter()
                    .zip(&placed)
                    .map(|(id, &(pos, width, height))| PlacedNode {
                        id: id.as_str(),
                        x: pos.x,
                        y: pos.y,
                        width,
                        height,
                    })
                    .collect(),
                anchors,
            };
            write_json(&out, args.pretty)
        }
    }
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
