use reqwest::Client;

use crate::{config, error::SpotifyError, types::CurrentUser};

/// Fetches the profile of the user the token belongs to.
pub async fn current_user(token: &str) -> Result<CurrentUser, SpotifyError> {
    let request = Client::new()
        .get(format!("{}/me", config::spotify_apiurl()))
        .bearer_auth(token);

    let response = super::send(request, "read the user profile").await?;
    Ok(response.json::<CurrentUser>().await?)
}
