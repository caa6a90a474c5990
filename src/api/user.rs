//! User profiles and the per-user subsections.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	api::{self, Collection, List, Wantlist},
	client::Client,
	util::{self, QueryParams},
};

/// User section.
#[derive(Clone, Copy, Debug)]
pub struct User<'a> {
	client: &'a Client,
}
impl<'a> User<'a> {
	pub(crate) fn new(client: &'a Client) -> Self {
		Self { client }
	}

	/// Public profile of a user.
	pub async fn profile(&self, user: &str) -> Result<Value> {
		self.client.get(api::user_path(user)).await
	}

	/// Marketplace inventory of a user.
	pub async fn inventory(&self, user: &str, params: &QueryParams) -> Result<Value> {
		self.get_listing(user, "inventory", params).await
	}

	/// Database contributions of a user.
	pub async fn contributions(&self, user: &str, params: &QueryParams) -> Result<Value> {
		self.get_listing(user, "contributions", params).await
	}

	/// Database submissions of a user.
	pub async fn submissions(&self, user: &str, params: &QueryParams) -> Result<Value> {
		self.get_listing(user, "submissions", params).await
	}

	/// Lists created by a user.
	pub async fn lists(&self, user: &str, params: &QueryParams) -> Result<Value> {
		self.get_listing(user, "lists", params).await
	}

	/// Identity of the authenticated user.
	pub async fn identity(&self) -> Result<Value> {
		self.client.identity().await
	}

	/// Collection subsection.
	pub fn collection(&self) -> Collection<'a> {
		Collection::new(self.client)
	}

	/// Wantlist subsection.
	pub fn wantlist(&self) -> Wantlist<'a> {
		Wantlist::new(self.client)
	}

	/// List subsection.
	pub fn list(&self) -> List<'a> {
		List::new(self.client)
	}

	async fn get_listing(
		&self,
		user: &str,
		resource: &str,
		params: &QueryParams,
	) -> Result<Value> {
		let path = format!("{}/{resource}", api::user_path(user));

		self.client.get(util::add_params(&path, params)).await
	}
}
