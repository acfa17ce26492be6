use compression_board_scalars::{is_active, HostEnvironment, ScalarStore};
use serde::Serialize;
use std::collections::BTreeMap;

pub const PLUGIN_NAME: &str = "compression";
pub const PLUGIN_ROUTE_PREFIX: &str = "/data/plugin/compression";
pub const TAB_NAME: &str = "COMPRESSION";
/// Resolved by the host against `/data`, not against the plugin route.
pub const ES_MODULE_PATH: &str = "/plugin/compression/render.js";

/// What the host needs to know to show the plugin's tab.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PluginManifest {
	pub tab_name: &'static str,
	pub es_module_path: &'static str,
	pub disable_reload: bool,
	pub enabled: bool,
}

/// The store offers both read interfaces.
pub fn host_environment(store: &ScalarStore) -> HostEnvironment<'_> {
	HostEnvironment {
		provider: Some(store),
		multiplexer: Some(store),
	}
}

pub fn manifest(host: &HostEnvironment) -> PluginManifest {
	PluginManifest {
		tab_name: TAB_NAME,
		es_module_path: ES_MODULE_PATH,
		disable_reload: false,
		enabled: is_active(host),
	}
}

pub fn plugins_listing(host: &HostEnvironment) -> BTreeMap<&'static str, PluginManifest> {
	let mut listing = BTreeMap::new();
	listing.insert(PLUGIN_NAME, manifest(host));
	listing
}

#[test]
fn test_manifest_enabled_only_with_compression_tags() {
	let mut store = ScalarStore::new();
	assert!(!manifest(&host_environment(&store)).enabled);
	store.add_event(
		"alexnet",
		compression_board_scalars::Event {
			tag: "alexnet/metrics/accuracy/fp32".to_owned(),
			step: 0,
			wall_time: 0.0,
			payload: compression_board_scalars::EventPayload::Scalar { value: 0.9 },
		},
	);
	assert!(!manifest(&host_environment(&store)).enabled);
	store.add_event(
		"alexnet",
		compression_board_scalars::Event {
			tag: "alexnet/compression/speedup".to_owned(),
			step: 0,
			wall_time: 0.0,
			payload: compression_board_scalars::EventPayload::Scalar { value: 2.0 },
		},
	);
	assert_eq!(
		manifest(&host_environment(&store)),
		PluginManifest {
			tab_name: "COMPRESSION",
			es_module_path: "/plugin/compression/render.js",
			disable_reload: false,
			enabled: true,
		}
	);
	assert!(!manifest(&HostEnvironment::default()).enabled);
}
