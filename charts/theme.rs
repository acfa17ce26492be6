use html::Node;

/// The colors and font every rendered element is styled with.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorTokens {
	pub bg_color: String,
	pub text_color: String,
	pub font_family: String,
	pub font_size: String,
	pub border_color: String,
	pub hover_bg: String,
	pub header_bg: String,
	pub even_row_bg: String,
	pub card_bg: String,
	pub card_header_bg: String,
	pub sidebar_bg: String,
	pub secondary_text: String,
	pub active_button_bg: String,
	pub is_dark: bool,
}

impl Default for ColorTokens {
	fn default() -> ColorTokens {
		ColorTokens {
			bg_color: "#202124".to_owned(),
			text_color: "#e8eaed".to_owned(),
			font_family: "Roboto, sans-serif".to_owned(),
			font_size: "13px".to_owned(),
			border_color: "#3c4043".to_owned(),
			hover_bg: "#3c4043".to_owned(),
			header_bg: "#303134".to_owned(),
			even_row_bg: "#292a2d".to_owned(),
			card_bg: "#303134".to_owned(),
			card_header_bg: "#2d2e31".to_owned(),
			sidebar_bg: "#202124".to_owned(),
			secondary_text: "#9aa0a6".to_owned(),
			active_button_bg: "rgb(70, 74, 77)".to_owned(),
			is_dark: true,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	/// Parse `rgb(r, g, b)` or `#rrggbb`.
	pub fn parse(value: &str) -> Option<Rgb> {
		let value = value.trim();
		if let Some(hex) = value.strip_prefix('#') {
			if hex.len() != 6 || !hex.is_ascii() {
				return None;
			}
			let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
			return Some(Rgb {
				r: channel(0)?,
				g: channel(2)?,
				b: channel(4)?,
			});
		}
		let channels = value.strip_prefix("rgb(")?.strip_suffix(')')?;
		let mut channels = channels.split(',').map(|channel| channel.trim().parse::<u8>());
		let rgb = Rgb {
			r: channels.next()?.ok()?,
			g: channels.next()?.ok()?,
			b: channels.next()?.ok()?,
		};
		if channels.next().is_some() {
			return None;
		}
		Some(rgb)
	}

	/// Add `amount` to every channel, clamping to the valid range.
	pub fn adjust(self, amount: i32) -> Rgb {
		let channel = |value: u8| (value as i32 + amount).max(0).min(255) as u8;
		Rgb {
			r: channel(self.r),
			g: channel(self.g),
			b: channel(self.b),
		}
	}

	pub fn brightness(self) -> f64 {
		(self.r as f64 + self.g as f64 + self.b as f64) / 3.0
	}

	pub fn is_dark(self) -> bool {
		self.brightness() < 128.0
	}
}

impl std::fmt::Display for Rgb {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
	}
}

fn is_transparent(value: &str) -> bool {
	let value = value.trim();
	value == "transparent" || value == "rgba(0, 0, 0, 0)"
}

/// Computed style values read from the hosting document. Any of them may be unavailable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HostStyleSample {
	pub background: Option<String>,
	pub text: Option<String>,
	pub font_family: Option<String>,
	pub font_size: Option<String>,
	pub border: Option<String>,
	pub card: Option<String>,
}

/**
Derive a full set of tokens from a host sample. Light or dark is decided by the average channel of the background. Hover and even row colors are shifted from the background. A card color replaces the defaults unless it is transparent, and a border color is used unless it is transparent or equal to the background.
*/
pub fn derive_tokens(sample: &HostStyleSample) -> ColorTokens {
	let defaults = ColorTokens::default();
	let (bg_color, bg) = match sample
		.background
		.as_ref()
		.filter(|background| !is_transparent(background))
		.and_then(|background| Rgb::parse(background).map(|rgb| (background.clone(), rgb)))
	{
		Some(background) => background,
		None => return defaults,
	};
	let is_dark = bg.is_dark();
	let mut tokens = if is_dark {
		ColorTokens {
			hover_bg: bg.adjust(20).to_string(),
			even_row_bg: bg.adjust(-10).to_string(),
			..defaults.clone()
		}
	} else {
		ColorTokens {
			text_color: "#202124".to_owned(),
			border_color: "#e0e0e0".to_owned(),
			hover_bg: bg.adjust(-10).to_string(),
			header_bg: "#f1f3f4".to_owned(),
			even_row_bg: "#ffffff".to_owned(),
			card_bg: "#ffffff".to_owned(),
			card_header_bg: "#fafafa".to_owned(),
			secondary_text: "#5f6368".to_owned(),
			is_dark: false,
			..defaults.clone()
		}
	};
	tokens.bg_color = bg_color.clone();
	tokens.sidebar_bg = bg_color.clone();
	if let Some(text) = &sample.text {
		tokens.text_color = text.clone();
	}
	if let Some(font_family) = &sample.font_family {
		tokens.font_family = font_family.clone();
	}
	if let Some(font_size) = &sample.font_size {
		tokens.font_size = font_size.clone();
	}
	if let Some(card) = sample.card.as_ref().filter(|card| !is_transparent(card)) {
		tokens.card_bg = card.clone();
		tokens.card_header_bg = card.clone();
	}
	if let Some(border) = sample
		.border
		.as_ref()
		.filter(|border| !is_transparent(border) && **border != bg_color)
	{
		tokens.border_color = border.clone();
	}
	let hover = Rgb::parse(&tokens.hover_bg).unwrap_or(bg);
	tokens.active_button_bg = hover.adjust(if is_dark { 10 } else { -10 }).to_string();
	tokens
}

/// A source of color tokens that can report when they change.
pub trait ThemeProvider {
	fn current_tokens(&self) -> ColorTokens;
	fn on_change(&mut self, callback: Box<dyn FnMut(&ColorTokens)>);
}

/// Tokens given up front that never change.
pub struct FixedTheme(pub ColorTokens);

impl ThemeProvider for FixedTheme {
	fn current_tokens(&self) -> ColorTokens {
		self.0.clone()
	}

	fn on_change(&mut self, _callback: Box<dyn FnMut(&ColorTokens)>) {}
}

/**
Tokens derived from samples of the hosting document's computed styles. Whoever observes the document calls [`update`](#method.update) with a fresh sample, and the registered callbacks run only when the derived tokens differ from the current ones.
*/
#[derive(Default)]
pub struct HostStyleTheme {
	tokens: ColorTokens,
	callbacks: Vec<Box<dyn FnMut(&ColorTokens)>>,
}

impl HostStyleTheme {
	pub fn new(sample: &HostStyleSample) -> HostStyleTheme {
		HostStyleTheme {
			tokens: derive_tokens(sample),
			callbacks: Vec::new(),
		}
	}

	pub fn update(&mut self, sample: &HostStyleSample) -> bool {
		let tokens = derive_tokens(sample);
		if tokens == self.tokens {
			return false;
		}
		self.tokens = tokens;
		for callback in self.callbacks.iter_mut() {
			callback(&self.tokens);
		}
		true
	}
}

impl ThemeProvider for HostStyleTheme {
	fn current_tokens(&self) -> ColorTokens {
		self.tokens.clone()
	}

	fn on_change(&mut self, callback: Box<dyn FnMut(&ColorTokens)>) {
		self.callbacks.push(callback);
	}
}

/// The roles an element can take in chart markup. Each role names the token its color comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeRole {
	Text,
	SecondaryText,
	Axis,
	Grid,
	MarkerOutline,
}

impl ThemeRole {
	pub const ATTRIBUTE: &'static str = "data-theme-role";

	pub fn key(self) -> &'static str {
		match self {
			ThemeRole::Text => "text",
			ThemeRole::SecondaryText => "secondary-text",
			ThemeRole::Axis => "axis",
			ThemeRole::Grid => "grid",
			ThemeRole::MarkerOutline => "marker-outline",
		}
	}

	pub fn from_key(key: &str) -> Option<ThemeRole> {
		match key {
			"text" => Some(ThemeRole::Text),
			"secondary-text" => Some(ThemeRole::SecondaryText),
			"axis" => Some(ThemeRole::Axis),
			"grid" => Some(ThemeRole::Grid),
			"marker-outline" => Some(ThemeRole::MarkerOutline),
			_ => None,
		}
	}

	/// The attribute this role colors and its value under `tokens`.
	pub fn paint(self, tokens: &ColorTokens) -> (&'static str, String) {
		match self {
			ThemeRole::Text => ("fill", tokens.text_color.clone()),
			ThemeRole::SecondaryText => ("fill", tokens.secondary_text.clone()),
			ThemeRole::Axis => ("stroke", tokens.text_color.clone()),
			ThemeRole::Grid => ("stroke", tokens.border_color.clone()),
			ThemeRole::MarkerOutline => ("stroke", tokens.bg_color.clone()),
		}
	}
}

/// Patch the colors of already rendered markup in place, leaving its geometry untouched.
pub fn restyle(node: &mut Node, tokens: &ColorTokens) {
	node.visit_host_nodes_mut(&mut |node| {
		let role = node.get_attribute(ThemeRole::ATTRIBUTE).and_then(ThemeRole::from_key);
		if let Some(role) = role {
			let (attribute, value) = role.paint(tokens);
			node.set_attribute(attribute, value);
			if role == ThemeRole::Text || role == ThemeRole::SecondaryText {
				node.set_attribute("font-family", tokens.font_family.clone());
			}
		}
	});
}

/// The tokens as CSS custom properties, for the dashboard's stylesheet.
pub fn css_variables(tokens: &ColorTokens) -> String {
	let variables = [
		("--cb-bg", &tokens.bg_color),
		("--cb-text", &tokens.text_color),
		("--cb-font-family", &tokens.font_family),
		("--cb-font-size", &tokens.font_size),
		("--cb-border", &tokens.border_color),
		("--cb-hover-bg", &tokens.hover_bg),
		("--cb-header-bg", &tokens.header_bg),
		("--cb-even-row-bg", &tokens.even_row_bg),
		("--cb-card-bg", &tokens.card_bg),
		("--cb-card-header-bg", &tokens.card_header_bg),
		("--cb-sidebar-bg", &tokens.sidebar_bg),
		("--cb-secondary-text", &tokens.secondary_text),
		("--cb-active-button-bg", &tokens.active_button_bg),
	];
	let mut css = String::from(":root {\n");
	for (name, value) in variables.iter() {
		css.push_str(&format!("\t{}: {};\n", name, value));
	}
	css.push_str("}\n");
	css
}

#[test]
fn test_parse_rgb() {
	assert_eq!(Rgb::parse("rgb(32, 33, 36)"), Some(Rgb { r: 32, g: 33, b: 36 }));
	assert_eq!(Rgb::parse("#ffffff"), Some(Rgb { r: 255, g: 255, b: 255 }));
	assert_eq!(Rgb::parse("#fff"), None);
	assert_eq!(Rgb::parse("rgba(0, 0, 0, 0)"), None);
	assert_eq!(Rgb::parse("rgb(300, 0, 0)"), None);
	assert_eq!(Rgb::parse("blue"), None);
}

#[test]
fn test_adjust_clamps() {
	let rgb = Rgb { r: 250, g: 5, b: 100 };
	assert_eq!(rgb.adjust(10).to_string(), "rgb(255, 15, 110)");
	assert_eq!(rgb.adjust(-10).to_string(), "rgb(240, 0, 90)");
}

#[test]
fn test_derive_dark_tokens() {
	let tokens = derive_tokens(&HostStyleSample {
		background: Some("rgb(32, 33, 36)".to_owned()),
		text: Some("rgb(232, 234, 237)".to_owned()),
		border: Some("rgb(32, 33, 36)".to_owned()),
		card: Some("rgba(0, 0, 0, 0)".to_owned()),
		..Default::default()
	});
	assert!(tokens.is_dark);
	assert_eq!(tokens.hover_bg, "rgb(52, 53, 56)");
	assert_eq!(tokens.even_row_bg, "rgb(22, 23, 26)");
	assert_eq!(tokens.active_button_bg, "rgb(62, 63, 66)");
	assert_eq!(tokens.border_color, "#3c4043");
	assert_eq!(tokens.card_bg, "#303134");
	assert_eq!(tokens.text_color, "rgb(232, 234, 237)");
	assert_eq!(tokens.sidebar_bg, "rgb(32, 33, 36)");
}

#[test]
fn test_derive_light_tokens() {
	let tokens = derive_tokens(&HostStyleSample {
		background: Some("#ffffff".to_owned()),
		border: Some("rgb(218, 220, 224)".to_owned()),
		card: Some("rgb(248, 249, 250)".to_owned()),
		..Default::default()
	});
	assert!(!tokens.is_dark);
	assert_eq!(tokens.hover_bg, "rgb(245, 245, 245)");
	assert_eq!(tokens.even_row_bg, "#ffffff");
	assert_eq!(tokens.active_button_bg, "rgb(235, 235, 235)");
	assert_eq!(tokens.border_color, "rgb(218, 220, 224)");
	assert_eq!(tokens.card_bg, "rgb(248, 249, 250)");
	assert_eq!(tokens.card_header_bg, "rgb(248, 249, 250)");
	assert_eq!(tokens.secondary_text, "#5f6368");
	assert_eq!(tokens.text_color, "#202124");
}

#[test]
fn test_unreadable_background_uses_defaults() {
	let sample = HostStyleSample {
		background: Some("transparent".to_owned()),
		..Default::default()
	};
	assert_eq!(derive_tokens(&sample), ColorTokens::default());
}

#[test]
fn test_host_style_theme_notifies_on_change() {
	use std::{cell::RefCell, rc::Rc};
	let dark = HostStyleSample {
		background: Some("#202124".to_owned()),
		..Default::default()
	};
	let light = HostStyleSample {
		background: Some("#ffffff".to_owned()),
		..Default::default()
	};
	let mut theme = HostStyleTheme::new(&dark);
	let seen = Rc::new(RefCell::new(Vec::new()));
	let seen_in_callback = seen.clone();
	theme.on_change(Box::new(move |tokens: &ColorTokens| {
		seen_in_callback.borrow_mut().push(tokens.is_dark)
	}));
	assert!(!theme.update(&dark));
	assert!(theme.update(&light));
	assert!(!theme.current_tokens().is_dark);
	assert_eq!(*seen.borrow(), vec![false]);
}

#[test]
fn test_restyle_patches_roles() {
	let mut node: Node = html::HostNode::new("g")
		.child(
			html::HostNode::new("text")
				.attribute(ThemeRole::ATTRIBUTE, "text")
				.attribute("fill", "#e8eaed")
				.child("Accuracy"),
		)
		.child(
			html::HostNode::empty("line")
				.attribute(ThemeRole::ATTRIBUTE, "grid")
				.attribute("stroke", "#3c4043"),
		)
		.into();
	let tokens = derive_tokens(&HostStyleSample {
		background: Some("#ffffff".to_owned()),
		..Default::default()
	});
	restyle(&mut node, &tokens);
	assert_eq!(
		node.to_string(),
		r##"<g><text data-theme-role="text" fill="#202124" font-family="Roboto, sans-serif">Accuracy</text><line data-theme-role="grid" stroke="#e0e0e0" /></g>"##
	);
}
