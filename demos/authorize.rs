//! Prints the authorization URL of every supported platform for one `state` + callback pair.
//!
//! No network traffic happens here; `authorize` is pure URL construction.

// crates.io
use color_eyre::Result;
// self
use oauth2_sns::{
	auth::{ClientCredentials, Platform},
	provider::{ReqwestProvider, SnsProvider},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let state = "csrf-token-owned-by-the-caller";
	let callback = "https://app.example.com/oauth/callback";

	for platform in Platform::ALL {
		let credentials = ClientCredentials::new(format!("{platform}-client-id"), "unused-secret");
		let provider = ReqwestProvider::new(platform, credentials)?;

		println!("{:>6}: {}", platform.as_str(), provider.authorize(state, callback));
	}

	Ok(())
}
