//! Listings, orders, fees, and price suggestions.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	api::User,
	auth::AuthLevel,
	client::{Client, RequestOptions},
	util::{self, QueryParams},
};

/// Marketplace section.
///
/// Everything except listing lookups and fee calculations needs user-level credentials.
#[derive(Clone, Copy, Debug)]
pub struct Marketplace<'a> {
	client: &'a Client,
}
impl<'a> Marketplace<'a> {
	pub(crate) fn new(client: &'a Client) -> Self {
		Self { client }
	}

	/// Listing by id.
	pub async fn listing(&self, listing: u64) -> Result<Value> {
		self.client.get(format!("/marketplace/listings/{listing}")).await
	}

	/// Creates a listing.
	pub async fn add_listing<T>(&self, data: &T) -> Result<Value>
	where
		T: ?Sized + Serialize,
	{
		self.client.post(user_level("/marketplace/listings".into()), data).await
	}

	/// Updates a listing.
	pub async fn edit_listing<T>(&self, listing: u64, data: &T) -> Result<Value>
	where
		T: ?Sized + Serialize,
	{
		self.client.post(user_level(format!("/marketplace/listings/{listing}")), data).await
	}

	/// Removes a listing.
	pub async fn delete_listing(&self, listing: u64) -> Result<Value> {
		self.client.delete(user_level(format!("/marketplace/listings/{listing}"))).await
	}

	/// Orders of the authenticated seller.
	pub async fn orders(&self, params: &QueryParams) -> Result<Value> {
		self.client.get(user_level(util::add_params("/marketplace/orders", params))).await
	}

	/// Order by id.
	pub async fn order(&self, order: &str) -> Result<Value> {
		self.client.get(user_level(order_path(order))).await
	}

	/// Updates an order.
	pub async fn edit_order<T>(&self, order: &str, data: &T) -> Result<Value>
	where
		T: ?Sized + Serialize,
	{
		self.client.post(user_level(order_path(order)), data).await
	}

	/// Messages attached to an order.
	pub async fn order_messages(&self, order: &str, params: &QueryParams) -> Result<Value> {
		let path = util::add_params(&format!("{}/messages", order_path(order)), params);

		self.client.get(user_level(path)).await
	}

	/// Adds a message to an order.
	pub async fn add_order_message<T>(&self, order: &str, data: &T) -> Result<Value>
	where
		T: ?Sized + Serialize,
	{
		self.client.post(user_level(format!("{}/messages", order_path(order))), data).await
	}

	/// Selling fee for `price`, optionally in `currency`.
	pub async fn fee(&self, price: f64, currency: Option<&str>) -> Result<Value> {
		self.client.get(fee_path(price, currency)).await
	}

	/// Suggested prices for a release, per condition.
	pub async fn price_suggestions(&self, release: u64) -> Result<Value> {
		self.client.get(user_level(format!("/marketplace/price_suggestions/{release}"))).await
	}

	/// A user's inventory; same endpoint as [`User::inventory`].
	pub async fn inventory(&self, user: &str, params: &QueryParams) -> Result<Value> {
		User::new(self.client).inventory(user, params).await
	}
}

fn user_level(path: String) -> RequestOptions {
	RequestOptions::get(path).auth_level(AuthLevel::User)
}

fn order_path(order: &str) -> String {
	format!("/marketplace/orders/{}", util::escape(order))
}

fn fee_path(price: f64, currency: Option<&str>) -> String {
	match currency {
		Some(currency) => format!("/marketplace/fee/{price:.2}/{}", util::escape(currency)),
		None => format!("/marketplace/fee/{price:.2}"),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn fee_price_has_two_decimals() {
		assert_eq!(fee_path(10.0, None), "/marketplace/fee/10.00");
		assert_eq!(fee_path(9.999, Some("EUR")), "/marketplace/fee/10.00/EUR");
	}

	#[test]
	fn order_ids_are_escaped() {
		assert_eq!(order_path("1-1"), "/marketplace/orders/1-1");
		assert_eq!(order_path("a/b"), "/marketplace/orders/a%2Fb");
	}
}
