use nodetree::{descendants, query_id, query_name, Element, NodeId, NodeTree};

/// screen
/// ├── header#top
/// │   ├── icon
/// │   └── title#title
/// └── body#main
///     ├── label#title
///     └── label#status
fn screen() -> (NodeTree<Element>, Vec<NodeId>) {
    let mut tree = NodeTree::new();
    let screen = tree.insert(Element::new("screen"));
    let header = tree.insert(Element::new("header").id("top"));
    let icon = tree.insert(Element::new("icon"));
    let title = tree.insert(Element::new("title").id("title"));
    let body = tree.insert(Element::new("body").id("main"));
    let label = tree.insert(Element::new("label").id("title"));
    let status = tree.insert(Element::new("label").id("status"));

    tree.append_child(screen, header).unwrap();
    tree.append_child(header, icon).unwrap();
    tree.append_child(header, title).unwrap();
    tree.append_child(screen, body).unwrap();
    tree.append_child(body, label).unwrap();
    tree.append_child(body, status).unwrap();

    (tree, vec![screen, header, icon, title, body, label, status])
}

#[test]
fn test_descendants_pre_order() {
    let (tree, nodes) = screen();
    let walked: Vec<_> = descendants(&tree, nodes[0]).collect();
    assert_eq!(walked, nodes[1..].to_vec());
}

#[test]
fn test_descendants_of_leaf_and_stale() {
    let (mut tree, nodes) = screen();
    assert_eq!(descendants(&tree, nodes[2]).count(), 0);

    let body = nodes[4];
    tree.destroy(body).unwrap();
    assert_eq!(descendants(&tree, body).count(), 0);
    assert_eq!(descendants(&tree, nodes[0]).count(), 3);
}

#[test]
fn test_query_id_prefers_shallow_match() {
    let (tree, nodes) = screen();

    assert_eq!(query_id(&tree, nodes[0], "main"), Some(nodes[4]));
    assert_eq!(query_id(&tree, nodes[0], "status"), Some(nodes[6]));
    // Both header and body hold a "title"; header comes first.
    assert_eq!(query_id(&tree, nodes[0], "title"), Some(nodes[3]));
    assert_eq!(query_id(&tree, nodes[4], "title"), Some(nodes[5]));
    assert_eq!(query_id(&tree, nodes[0], "missing"), None);
}

#[test]
fn test_query_name() {
    let (tree, nodes) = screen();

    assert_eq!(query_name(&tree, nodes[0], "label"), vec![nodes[5], nodes[6]]);
    assert_eq!(query_name(&tree, nodes[1], "label"), Vec::<NodeId>::new());
}
