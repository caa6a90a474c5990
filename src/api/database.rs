//! Artists, releases, masters, labels, images, and search.

// crates.io
use serde_json::{Value, json};
// self
use crate::{
	_prelude::*,
	auth::AuthLevel,
	client::{Client, RequestOptions},
	util::{self, QueryParams},
};

/// Highest rating the service accepts.
pub const MAX_RATING: u8 = 5;

/// Moderation status of a database submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
	/// Accepted into the database.
	Accepted,
	/// Not yet submitted.
	Draft,
	/// Removed.
	Deleted,
	/// Refused by moderators.
	Rejected,
}
impl SubmissionStatus {
	/// Label used by the service.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Accepted => "Accepted",
			Self::Draft => "Draft",
			Self::Deleted => "Deleted",
			Self::Rejected => "Rejected",
		}
	}
}
impl Display for SubmissionStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Database section.
#[derive(Clone, Copy, Debug)]
pub struct Database<'a> {
	client: &'a Client,
}
impl<'a> Database<'a> {
	pub(crate) fn new(client: &'a Client) -> Self {
		Self { client }
	}

	/// Artist by id.
	pub async fn artist(&self, artist: u64) -> Result<Value> {
		self.client.get(format!("/artists/{artist}")).await
	}

	/// Releases and masters credited to an artist.
	pub async fn artist_releases(&self, artist: u64, params: &QueryParams) -> Result<Value> {
		self.client.get(util::add_params(&format!("/artists/{artist}/releases"), params)).await
	}

	/// Release by id.
	pub async fn release(&self, release: u64) -> Result<Value> {
		self.client.get(format!("/releases/{release}")).await
	}

	/// Rating a user gave a release.
	pub async fn release_rating(&self, release: u64, user: &str) -> Result<Value> {
		self.client.get(rating_path(release, user)).await
	}

	/// Sets (or, with `None` or `0`, removes) a user's rating; values above 5 are clamped.
	pub async fn set_release_rating(
		&self,
		release: u64,
		user: &str,
		rating: Option<u8>,
	) -> Result<Value> {
		let options = RequestOptions::get(rating_path(release, user)).auth_level(AuthLevel::User);

		match rating.filter(|rating| *rating > 0) {
			Some(rating) =>
				self.client.put(options, &json!({ "rating": rating.min(MAX_RATING) })).await,
			None => self.client.delete(options).await,
		}
	}

	/// Master release by id.
	pub async fn master(&self, master: u64) -> Result<Value> {
		self.client.get(format!("/masters/{master}")).await
	}

	/// Versions of a master release.
	pub async fn master_versions(&self, master: u64, params: &QueryParams) -> Result<Value> {
		self.client.get(util::add_params(&format!("/masters/{master}/versions"), params)).await
	}

	/// Label by id.
	pub async fn label(&self, label: u64) -> Result<Value> {
		self.client.get(format!("/labels/{label}")).await
	}

	/// Releases published by a label.
	pub async fn label_releases(&self, label: u64, params: &QueryParams) -> Result<Value> {
		self.client.get(util::add_params(&format!("/labels/{label}/releases"), params)).await
	}

	/// Downloads an image; image hosts are not metered, so the governor is bypassed.
	pub async fn image(&self, url: &str) -> Result<Vec<u8>> {
		Ok(self.client.send(RequestOptions::get(url).unqueued()).await?.into_bytes())
	}

	/// Database search; needs consumer-level credentials.
	pub async fn search(&self, query: Option<&str>, params: &QueryParams) -> Result<Value> {
		let mut params = params.clone();

		if let Some(query) = query {
			params.push("q", query);
		}

		let path = util::add_params("/database/search", &params);

		self.client.get(RequestOptions::get(path).auth_level(AuthLevel::Consumer)).await
	}
}

fn rating_path(release: u64, user: &str) -> String {
	format!("/releases/{release}/rating/{}", util::escape(user))
}
