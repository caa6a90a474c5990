//! User-curated lists.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	client::Client,
	util::{self, QueryParams},
};

/// List section.
#[derive(Clone, Copy, Debug)]
pub struct List<'a> {
	client: &'a Client,
}
impl<'a> List<'a> {
	pub(crate) fn new(client: &'a Client) -> Self {
		Self { client }
	}

	/// Items of a list.
	pub async fn items(&self, list: &str, params: &QueryParams) -> Result<Value> {
		let path = format!("/lists/{}", util::escape(list));

		self.client.get(util::add_params(&path, params)).await
	}
}
