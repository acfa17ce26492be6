/*!
A small node tree for building HTML and SVG markup on the server and in the browser client. Text and attribute values are escaped when the tree is rendered with `Display`.
*/

use derive_more::From;
use std::borrow::Cow;
use std::fmt::Write;

#[derive(Clone, Debug)]
pub enum Node {
	RawText(RawTextNode),
	EscapedText(EscapedTextNode),
	Fragment(FragmentNode),
	Host(HostNode),
	Option(Option<Box<Node>>),
	Vec(Vec<Node>),
}

#[derive(Clone, Debug)]
pub struct RawTextNode(pub Cow<'static, str>);

#[derive(Clone, Debug)]
pub struct EscapedTextNode(pub Cow<'static, str>);

#[derive(Clone, Debug, Default)]
pub struct FragmentNode {
	pub children: Vec<Node>,
}

#[derive(Clone, Debug)]
pub struct HostNode {
	pub name: &'static str,
	pub attributes: Vec<(AttributeKey, AttributeValue)>,
	pub children: Vec<Node>,
	pub self_closing: bool,
}

pub type AttributeKey = &'static str;

#[derive(Clone, Debug, From)]
pub enum AttributeValue {
	Bool(Option<bool>),
	String(Option<Cow<'static, str>>),
}

impl HostNode {
	pub fn new(name: &'static str) -> HostNode {
		HostNode {
			name,
			attributes: Vec::new(),
			children: Vec::new(),
			self_closing: false,
		}
	}

	/// A node rendered as `<name ... />`, used for SVG shapes and void HTML elements.
	pub fn empty(name: &'static str) -> HostNode {
		HostNode {
			self_closing: true,
			..HostNode::new(name)
		}
	}

	pub fn attribute(mut self, key: AttributeKey, value: impl Into<AttributeValue>) -> HostNode {
		self.attributes.push((key, value.into()));
		self
	}

	pub fn child(mut self, child: impl Into<Node>) -> HostNode {
		self.children.push(child.into());
		self
	}

	pub fn children<I, T>(mut self, children: I) -> HostNode
	where
		I: IntoIterator<Item = T>,
		T: Into<Node>,
	{
		self.children
			.extend(children.into_iter().map(|child| child.into()));
		self
	}

	/// Look up the value of a string attribute, if it is set.
	pub fn get_attribute(&self, key: &str) -> Option<&str> {
		self.attributes.iter().find_map(|(k, value)| match value {
			AttributeValue::String(Some(value)) if *k == key => Some(value.as_ref()),
			_ => None,
		})
	}

	/// Set a string attribute, replacing any previous value.
	pub fn set_attribute(&mut self, key: AttributeKey, value: impl Into<AttributeValue>) {
		let value = value.into();
		match self.attributes.iter_mut().find(|(k, _)| *k == key) {
			Some(entry) => entry.1 = value,
			None => self.attributes.push((key, value)),
		}
	}
}

impl Node {
	pub fn render_to_string(&self) -> String {
		self.to_string()
	}

	/// Visit every host node in the tree depth first, allowing it to be mutated in place.
	pub fn visit_host_nodes_mut(&mut self, f: &mut dyn FnMut(&mut HostNode)) {
		match self {
			Node::Host(node) => {
				f(node);
				for child in node.children.iter_mut() {
					child.visit_host_nodes_mut(f);
				}
			}
			Node::Fragment(node) => {
				for child in node.children.iter_mut() {
					child.visit_host_nodes_mut(f);
				}
			}
			Node::Vec(nodes) => {
				for child in nodes.iter_mut() {
					child.visit_host_nodes_mut(f);
				}
			}
			Node::Option(Some(node)) => node.visit_host_nodes_mut(f),
			_ => {}
		}
	}
}

impl std::fmt::Display for Node {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Node::RawText(node) => {
				write!(f, "{}", node)?;
			}
			Node::EscapedText(node) => {
				write!(f, "{}", node)?;
			}
			Node::Fragment(node) => {
				write!(f, "{}", node)?;
			}
			Node::Host(node) => {
				write!(f, "{}", node)?;
			}
			Node::Option(node) => {
				if let Some(node) = node {
					write!(f, "{}", node)?;
				}
			}
			Node::Vec(node) => {
				for node in node {
					write!(f, "{}", node)?;
				}
			}
		};
		Ok(())
	}
}

impl std::fmt::Display for FragmentNode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for child in self.children.iter() {
			write!(f, "{}", child)?;
		}
		Ok(())
	}
}

impl std::fmt::Display for HostNode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "<{}", self.name)?;
		for (key, value) in self.attributes.iter() {
			match value {
				AttributeValue::Bool(value) => {
					if let Some(true) = value {
						write!(f, " {}", key)?;
					}
				}
				AttributeValue::String(value) => {
					if let Some(value) = value {
						write!(f, r#" {}=""#, key)?;
						write_escaped(f, value)?;
						write!(f, r#"""#)?;
					}
				}
			}
		}
		if self.self_closing {
			write!(f, " />")?;
			return Ok(());
		}
		write!(f, ">")?;
		for child in self.children.iter() {
			write!(f, "{}", child)?;
		}
		write!(f, "</{}>", self.name)?;
		Ok(())
	}
}

impl std::fmt::Display for RawTextNode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::fmt::Display for EscapedTextNode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write_escaped(f, &self.0)
	}
}

fn write_escaped(f: &mut std::fmt::Formatter<'_>, value: &str) -> std::fmt::Result {
	for c in value.chars() {
		match c {
			'>' => write!(f, "&gt;")?,
			'<' => write!(f, "&lt;")?,
			'"' => write!(f, "&quot;")?,
			'&' => write!(f, "&amp;")?,
			'\'' => write!(f, "&apos;")?,
			c => f.write_char(c)?,
		};
	}
	Ok(())
}

impl From<Option<String>> for AttributeValue {
	fn from(value: Option<String>) -> AttributeValue {
		AttributeValue::String(value.map(|value| value.into()))
	}
}

impl From<String> for AttributeValue {
	fn from(value: String) -> AttributeValue {
		AttributeValue::String(Some(value.into()))
	}
}

impl From<&'static str> for AttributeValue {
	fn from(value: &'static str) -> AttributeValue {
		AttributeValue::String(Some(value.into()))
	}
}

impl From<bool> for AttributeValue {
	fn from(value: bool) -> AttributeValue {
		AttributeValue::Bool(Some(value))
	}
}

impl From<f64> for AttributeValue {
	fn from(value: f64) -> AttributeValue {
		AttributeValue::String(Some(format_number(value).into()))
	}
}

impl From<RawTextNode> for Node {
	fn from(value: RawTextNode) -> Node {
		Node::RawText(value)
	}
}

impl From<EscapedTextNode> for Node {
	fn from(value: EscapedTextNode) -> Node {
		Node::EscapedText(value)
	}
}

impl From<FragmentNode> for Node {
	fn from(value: FragmentNode) -> Node {
		Node::Fragment(value)
	}
}

impl From<HostNode> for Node {
	fn from(value: HostNode) -> Node {
		Node::Host(value)
	}
}

impl From<Vec<Node>> for Node {
	fn from(value: Vec<Node>) -> Node {
		Node::Vec(value)
	}
}

impl From<String> for Node {
	fn from(value: String) -> Node {
		Node::EscapedText(EscapedTextNode(value.into()))
	}
}

impl From<&'static str> for Node {
	fn from(value: &'static str) -> Node {
		Node::EscapedText(EscapedTextNode(value.into()))
	}
}

impl<T> From<Option<T>> for Node
where
	T: Into<Node>,
{
	fn from(value: Option<T>) -> Node {
		Node::Option(value.map(|value| Box::new(value.into())))
	}
}

/// Format a coordinate for an attribute, dropping a trailing `.0` and limiting precision to two decimals.
pub fn format_number(value: f64) -> String {
	let rounded = (value * 100.0).round() / 100.0;
	if rounded == rounded.trunc() {
		format!("{}", rounded as i64)
	} else {
		let formatted = format!("{:.2}", rounded);
		formatted.trim_end_matches('0').to_owned()
	}
}

/// Join class names, skipping the ones that are `None`.
#[macro_export]
macro_rules! classes {
	($($class:expr),* $(,)?) => {{
		let classes: Vec<Option<&str>> = vec![$($crate::IntoClass::into_class($class)),*];
		classes.into_iter().flatten().collect::<Vec<&str>>().join(" ")
	}};
}

#[doc(hidden)]
pub trait IntoClass<'a> {
	fn into_class(self) -> Option<&'a str>;
}

impl<'a> IntoClass<'a> for &'a str {
	fn into_class(self) -> Option<&'a str> {
		Some(self)
	}
}

impl<'a> IntoClass<'a> for Option<&'a str> {
	fn into_class(self) -> Option<&'a str> {
		self
	}
}

/// Build an inline `style` attribute from property and value pairs, skipping values that are `None`.
#[macro_export]
macro_rules! style {
	($($key:expr => $value:expr),* $(,)?) => {{
		let mut style = String::new();
		$(
			if let Some(value) = $crate::IntoStyleValue::into_style_value($value) {
				style.push_str($key);
				style.push_str(": ");
				style.push_str(&value);
				style.push_str("; ");
			}
		)*
		style.trim_end().to_owned()
	}};
}

#[doc(hidden)]
pub trait IntoStyleValue {
	fn into_style_value(self) -> Option<String>;
}

impl IntoStyleValue for String {
	fn into_style_value(self) -> Option<String> {
		Some(self)
	}
}

impl IntoStyleValue for &str {
	fn into_style_value(self) -> Option<String> {
		Some(self.to_owned())
	}
}

impl IntoStyleValue for Option<String> {
	fn into_style_value(self) -> Option<String> {
		self
	}
}

#[macro_export]
macro_rules! raw {
	($t:expr) => {
		$crate::RawTextNode($t.into())
	};
}

#[macro_export]
macro_rules! text {
	($t:expr) => {
		$crate::EscapedTextNode($t.into())
	};
}

#[test]
fn test_render_escapes_text_and_attributes() {
	let node: Node = HostNode::new("div")
		.attribute("class", "run-label")
		.attribute("title", "a \"quoted\" <name>".to_owned())
		.attribute("hidden", false)
		.child("alexnet & co")
		.into();
	assert_eq!(
		node.to_string(),
		r#"<div class="run-label" title="a &quot;quoted&quot; &lt;name&gt;">alexnet &amp; co</div>"#
	);
}

#[test]
fn test_render_self_closing() {
	let node: Node = HostNode::empty("rect")
		.attribute("x", 1.5)
		.attribute("width", 5.0)
		.into();
	assert_eq!(node.to_string(), r#"<rect x="1.5" width="5" />"#);
}

#[test]
fn test_format_number() {
	assert_eq!(format_number(70.0), "70");
	assert_eq!(format_number(12.346), "12.35");
	assert_eq!(format_number(0.5), "0.5");
	assert_eq!(format_number(-3.0), "-3");
}

#[test]
fn test_classes_and_style() {
	let sorted: Option<&str> = Some("sort-asc");
	let hidden: Option<&str> = None;
	assert_eq!(classes!("sortable", sorted, hidden), "sortable sort-asc");
	let color: Option<String> = None;
	assert_eq!(
		style! { "width" => "100%", "background-color" => color },
		"width: 100%;"
	);
}
