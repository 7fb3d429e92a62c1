//! Node icons, loaded once per URL and drawn when ready.

use std::collections::HashMap;

use log::warn;
use web_sys::HtmlImageElement;

#[derive(Default)]
pub struct ImageCache {
	images: HashMap<String, Option<HtmlImageElement>>,
}

impl ImageCache {
	/// The decoded image for `url`, starting the download on first use.
	/// `None` while loading, or for good if the element cannot be created.
	pub fn get(&mut self, url: &str) -> Option<&HtmlImageElement> {
		let image = self
			.images
			.entry(url.to_string())
			.or_insert_with(|| match HtmlImageElement::new() {
				Ok(image) => {
					image.set_src(url);
					Some(image)
				}
				Err(err) => {
					warn!("ping-graph: cannot load icon {url}: {err:?}");
					None
				}
			})
			.as_ref()?;
		(image.complete() && image.natural_width() > 0).then_some(image)
	}
}
