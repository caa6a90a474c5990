//! Endpoint sections.
//!
//! Each section borrows a [`Client`](crate::client::Client), builds endpoint paths (escaping user
//! names and list identifiers), and delegates to the request pipeline. Sections are cheap to
//! create, so accessors hand out a fresh one on every call.

pub mod collection;
pub mod database;
pub mod list;
pub mod marketplace;
pub mod user;
pub mod wantlist;

pub use collection::*;
pub use database::*;
pub use list::*;
pub use marketplace::*;
pub use user::*;
pub use wantlist::*;

// self
use crate::util;

fn user_path(user: &str) -> String {
	format!("/users/{}", util::escape(user))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn user_names_are_escaped() {
		assert_eq!(user_path("rodneyfool"), "/users/rodneyfool");
		assert_eq!(user_path("a b&c"), "/users/a%20b%26c");
	}
}
