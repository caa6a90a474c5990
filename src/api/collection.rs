//! Collection folders and the releases filed in them.

// crates.io
use serde_json::{Value, json};
// self
use crate::{
	_prelude::*,
	api,
	auth::AuthLevel,
	client::{Client, RequestOptions},
	util::{self, QueryParams},
};

/// Folder holding every release in a collection; readable without user credentials.
pub const ALL_FOLDER: u64 = 0;
/// Default folder for newly added releases.
pub const UNCATEGORIZED_FOLDER: u64 = 1;

/// Collection section.
#[derive(Clone, Copy, Debug)]
pub struct Collection<'a> {
	client: &'a Client,
}
impl<'a> Collection<'a> {
	pub(crate) fn new(client: &'a Client) -> Self {
		Self { client }
	}

	/// Folders of a user's collection.
	pub async fn folders(&self, user: &str) -> Result<Value> {
		self.client.get(folders_path(user)).await
	}

	/// Folder metadata.
	///
	/// Any folder other than [`ALL_FOLDER`] needs user-level credentials; the check runs before
	/// any request is made.
	pub async fn folder(&self, user: &str, folder: u64) -> Result<Value> {
		self.ensure_folder_access(folder)?;

		self.client.get(folder_path(user, folder)).await
	}

	/// Creates a folder.
	pub async fn add_folder(&self, user: &str, name: &str) -> Result<Value> {
		self.client.post(user_level(folders_path(user)), &json!({ "name": name })).await
	}

	/// Renames a folder.
	pub async fn set_folder_name(&self, user: &str, folder: u64, name: &str) -> Result<Value> {
		self.client.post(user_level(folder_path(user, folder)), &json!({ "name": name })).await
	}

	/// Deletes an empty folder.
	pub async fn delete_folder(&self, user: &str, folder: u64) -> Result<Value> {
		self.client.delete(user_level(folder_path(user, folder))).await
	}

	/// Releases filed in a folder; same access rule as [`folder`](Self::folder).
	pub async fn releases(&self, user: &str, folder: u64, params: &QueryParams) -> Result<Value> {
		self.ensure_folder_access(folder)?;

		let path = format!("{}/releases", folder_path(user, folder));

		self.client.get(util::add_params(&path, params)).await
	}

	/// Instances of a release across a user's collection.
	pub async fn release_instances(&self, user: &str, release: u64) -> Result<Value> {
		self.client.get(format!("{}/collection/releases/{release}", api::user_path(user))).await
	}

	/// Files a release in `folder` ([`UNCATEGORIZED_FOLDER`] when `None` or `0`).
	pub async fn add_release(
		&self,
		user: &str,
		folder: Option<u64>,
		release: u64,
	) -> Result<Value> {
		let folder =
			folder.filter(|folder| *folder != ALL_FOLDER).unwrap_or(UNCATEGORIZED_FOLDER);
		let options =
			RequestOptions::post(format!("{}/releases/{release}", folder_path(user, folder)))
				.auth_level(AuthLevel::User);

		self.client.send(options).await?.json()
	}

	/// Updates a release instance (rating, folder, notes).
	pub async fn edit_release<T>(
		&self,
		user: &str,
		folder: u64,
		release: u64,
		instance: u64,
		data: &T,
	) -> Result<Value>
	where
		T: ?Sized + Serialize,
	{
		self.client.post(user_level(instance_path(user, folder, release, instance)), data).await
	}

	/// Removes a release instance from a folder.
	pub async fn remove_release(
		&self,
		user: &str,
		folder: u64,
		release: u64,
		instance: u64,
	) -> Result<Value> {
		self.client.delete(user_level(instance_path(user, folder, release, instance))).await
	}

	fn ensure_folder_access(&self, folder: u64) -> Result<()> {
		if folder == ALL_FOLDER || self.client.authenticated(AuthLevel::User) {
			return Ok(());
		}

		Err(Error::Unauthorized { required: AuthLevel::User, current: self.client.auth_level() })
	}
}

fn user_level(path: String) -> RequestOptions {
	RequestOptions::get(path).auth_level(AuthLevel::User)
}

fn folders_path(user: &str) -> String {
	format!("{}/collection/folders", api::user_path(user))
}

fn folder_path(user: &str, folder: u64) -> String {
	format!("{}/{folder}", folders_path(user))
}

fn instance_path(user: &str, folder: u64, release: u64, instance: u64) -> String {
	format!("{}/releases/{release}/instances/{instance}", folder_path(user, folder))
}
