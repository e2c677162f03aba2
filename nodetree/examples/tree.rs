use std::fs::File;

use nodetree::{query_id, Element, NodeTree, TreeConfig, TreeError};
use simplelog::{Config, LevelFilter, WriteLogger};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up file logging
    let log_file = File::create("tree.log")?;
    WriteLogger::init(LevelFilter::Trace, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let mut tree = NodeTree::with_config(TreeConfig::new().capacity(16).max_depth(8));

    let screen = tree.insert(Element::new("screen"));
    let header = tree.insert(Element::new("header").id("header"));
    let icon = tree.insert(Element::new("icon").sort_order(0));
    let clock = tree.insert(Element::new("clock").sort_order(2));
    let title = tree.insert(Element::new("title").id("title").sort_order(1));
    let body = tree.insert(Element::new("body").id("body"));

    tree.append_child(screen, header)?;
    tree.append_child(screen, body)?;
    for child in [clock, title, icon] {
        tree.append_child(header, child)?;
    }
    tree.sort_children(header, false)?;

    print_versions(&tree, "built", &[screen, header, body]);

    // A second "title" under the header is refused and changes nothing.
    let impostor = tree.insert(Element::new("title").id("title"));
    match tree.append_child(header, impostor) {
        Err(TreeError::List(err)) => println!("rejected: {err}"),
        other => println!("unexpected: {other:?}"),
    }
    print_versions(&tree, "after rejected append", &[screen, header, body]);

    tree.remove_child(header, clock)?;
    print_versions(&tree, "after removing clock", &[screen, header, body]);

    if let Some(found) = query_id(&tree, screen, "title") {
        println!("#title is {found}");
    }
    Ok(())
}

fn print_versions(tree: &NodeTree<Element>, label: &str, nodes: &[nodetree::NodeId]) {
    let versions: Vec<String> = nodes
        .iter()
        .filter_map(|&node| {
            let name = &tree.widget(node)?.name;
            Some(format!("{name}={}", tree.version(node)?))
        })
        .collect();
    println!("{label}: {}", versions.join(" "));
}
