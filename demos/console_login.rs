//! Console sign-in walkthrough.
//!
//! Reads `<PROVIDER>_CLIENT_ID`/`<PROVIDER>_CLIENT_SECRET` for Google, GitHub and Facebook
//! from the environment, prints the authorization URL for the chosen provider, then waits for
//! the full callback URL to be pasted back. The `state` parameter is checked before the code is
//! handed to the manager, and the normalized user is printed as JSON.

// std
use std::{
	env,
	io::{self, Write},
};
// crates.io
use color_eyre::{Result, eyre::eyre};
use rand::{Rng, distr::Alphanumeric};
// self
use oauth2_social::{
	config::{OAuthConfig, ProviderConfig, ProviderName},
	manager::{OAuthManager, OAuthRequest},
	url::Url,
};

const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000/auth/callback";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let redirect_uri =
		env::var("OAUTH_REDIRECT_URI").unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_owned());
	let mut config = OAuthConfig::new(redirect_uri);

	for name in [ProviderName::Google, ProviderName::Github, ProviderName::Facebook] {
		if let Some(provider_config) = provider_from_env(name) {
			config = config.with_provider(name, provider_config);
		}
	}

	let manager = OAuthManager::new();

	manager.configure(config)?;

	let configured = manager.configured_providers();

	if configured.is_empty() {
		return Err(eyre!(
			"No provider credentials found; set e.g. GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET."
		));
	}

	let names = configured.iter().map(|name| name.as_str()).collect::<Vec<_>>().join(", ");
	let provider = prompt(&format!("Provider ({names})"))?;
	let state = rand::rng().sample_iter(Alphanumeric).take(16).map(char::from).collect::<String>();
	let authorize_url = manager.authorization_url(&provider, Some(&state))?;

	println!("Open this URL in a browser and sign in:\n\n{authorize_url}\n");

	let callback = prompt("Paste the full URL the provider redirected to")?;
	let returned_state = Url::parse(&callback)?
		.query_pairs()
		.find(|(key, _)| key == "state")
		.map(|(_, value)| value.into_owned());

	if returned_state.as_deref() != Some(state.as_str()) {
		return Err(eyre!("Invalid state parameter."));
	}

	let user = manager.handle_callback(&provider, &OAuthRequest::from_url(callback)).await?;

	println!("Welcome, {}!", user.name);
	println!("Email: {}", user.email.as_deref().unwrap_or("N/A"));
	println!("{}", serde_json::to_string_pretty(&user)?);

	Ok(())
}

fn provider_from_env(name: ProviderName) -> Option<ProviderConfig> {
	let prefix = name.as_str().to_ascii_uppercase();
	let client_id = env::var(format!("{prefix}_CLIENT_ID")).ok()?;
	let client_secret = env::var(format!("{prefix}_CLIENT_SECRET")).ok()?;

	Some(ProviderConfig::new(client_id, client_secret))
}

fn prompt(message: &str) -> Result<String> {
	loop {
		print!("{message}: ");

		io::stdout().flush()?;

		let mut input = String::new();

		io::stdin().read_line(&mut input)?;

		let trimmed = input.trim();

		if !trimmed.is_empty() {
			return Ok(trimmed.to_owned());
		}
	}
}
