use html::Node;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Serialize a rendered chart as a standalone SVG document.
pub fn export_svg(chart: &Node) -> Option<String> {
	let mut svg = find_svg(chart)?.clone();
	if svg.get_attribute("xmlns").is_none() {
		svg.set_attribute("xmlns", SVG_NAMESPACE);
	}
	Some(format!(
		"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}",
		Node::Host(svg)
	))
}

fn find_svg(node: &Node) -> Option<&html::HostNode> {
	match node {
		Node::Host(host) if host.name == "svg" => Some(host),
		Node::Host(host) => host.children.iter().find_map(find_svg),
		Node::Fragment(fragment) => fragment.children.iter().find_map(find_svg),
		Node::Vec(nodes) => nodes.iter().find_map(find_svg),
		Node::Option(Some(node)) => find_svg(node),
		_ => None,
	}
}

/// The download name for a chart: its title lowercased with whitespace runs replaced by `_`.
pub fn svg_file_name(title: &str) -> String {
	let name = title
		.split_whitespace()
		.map(|word| word.to_lowercase())
		.collect::<Vec<_>>()
		.join("_");
	format!("{}.svg", name)
}

#[test]
fn test_svg_file_name() {
	assert_eq!(
		svg_file_name("Accuracy vs Model Size"),
		"accuracy_vs_model_size.svg"
	);
	assert_eq!(
		svg_file_name("Accuracy  vs\tEnergy Consumption"),
		"accuracy_vs_energy_consumption.svg"
	);
}

#[test]
fn test_export_svg() {
	let chart: Node = html::HostNode::new("div")
		.child(
			html::HostNode::new("svg")
				.attribute("width", 100.0)
				.child(html::HostNode::empty("rect")),
		)
		.into();
	insta::assert_snapshot!(export_svg(&chart).unwrap(), @r###"
	<?xml version="1.0" encoding="UTF-8"?>
	<svg width="100" xmlns="http://www.w3.org/2000/svg"><rect /></svg>
	"###);
	let placeholder: Node = html::HostNode::new("div").child("No data").into();
	assert_eq!(export_svg(&placeholder), None);
}
