use crate::{error, info, spotify};

use super::{access_token, spinner};

pub async fn me(bearer: Option<String>) {
    let token = access_token(bearer).await;

    let pb = spinner("Fetching user profile...");
    let user = spotify::user::current_user(&token).await;
    pb.finish_and_clear();

    let user = match user {
        Ok(u) => u,
        Err(e) => error!("Error getting user info: {}", e),
    };

    info!("User ID: {}", user.id);
    info!(
        "Display name: {}",
        user.display_name.as_deref().unwrap_or("-")
    );
    if let Some(country) = &user.country {
        info!("Country: {}", country);
    }
    if let Some(product) = &user.product {
        info!("Product: {}", product);
    }
    if let Some(url) = user.external_urls.get("spotify") {
        info!("Profile: {}", url);
    }
}
