use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, Element, HtmlAnchorElement, Url};

/// Every element under `root` matching `selector`, in document order.
pub fn query_all(root: &Element, selector: &str) -> Result<Vec<Element>, JsValue> {
	let nodes = root.query_selector_all(selector)?;
	Ok((0..nodes.length())
		.filter_map(|index| nodes.get(index))
		.filter_map(|node| node.dyn_into::<Element>().ok())
		.collect())
}

/// Offer `contents` to the user as a file download.
pub fn download(
	document: &Document,
	contents: &str,
	mime_type: &str,
	file_name: &str,
) -> Result<(), JsValue> {
	let parts = js_sys::Array::of1(&JsValue::from_str(contents));
	let options = BlobPropertyBag::new();
	options.set_type(mime_type);
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;
	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&url);
	anchor.set_download(file_name);
	anchor.click();
	Url::revoke_object_url(&url)?;
	Ok(())
}
