//! Wantlist management.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	api,
	auth::AuthLevel,
	client::{Client, RequestOptions},
	util::{self, QueryParams},
};

/// Wantlist section.
#[derive(Clone, Copy, Debug)]
pub struct Wantlist<'a> {
	client: &'a Client,
}
impl<'a> Wantlist<'a> {
	pub(crate) fn new(client: &'a Client) -> Self {
		Self { client }
	}

	/// Releases on a user's wantlist.
	pub async fn releases(&self, user: &str, params: &QueryParams) -> Result<Value> {
		self.client.get(util::add_params(&format!("{}/wants", api::user_path(user)), params)).await
	}

	/// Adds a release, optionally with notes and rating.
	pub async fn add_release(
		&self,
		user: &str,
		release: u64,
		data: Option<&Value>,
	) -> Result<Value> {
		let options = RequestOptions::put(want_path(user, release)).auth_level(AuthLevel::User);

		match data {
			Some(data) => self.client.put(options, data).await,
			None => self.client.send(options).await?.json(),
		}
	}

	/// Updates notes or rating of a wanted release.
	pub async fn edit_notes<T>(&self, user: &str, release: u64, data: &T) -> Result<Value>
	where
		T: ?Sized + Serialize,
	{
		let options = RequestOptions::put(want_path(user, release)).auth_level(AuthLevel::User);

		self.client.put(options, data).await
	}

	/// Removes a release.
	pub async fn remove_release(&self, user: &str, release: u64) -> Result<Value> {
		let options = RequestOptions::delete(want_path(user, release)).auth_level(AuthLevel::User);

		self.client.delete(options).await
	}
}

fn want_path(user: &str, release: u64) -> String {
	format!("{}/wants/{release}", api::user_path(user))
}
