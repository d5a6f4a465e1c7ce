//! HTML pages rendered on the browser-facing routes

use linker_domain::constants::WIKIDOT_AVATAR_URL;
use linker_domain::{DiscordAccount, WikidotAccount};

/// Success page shown after a consumed callback.
pub fn success_page(message: &str, discord: &DiscordAccount, wikidot: &WikidotAccount) -> String {
    let discord_icon = discord.avatar.as_deref().unwrap_or_default();
    let wikidot_icon = format!("{WIKIDOT_AVATAR_URL}{}", wikidot.wikidot_id);

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Account Linking</title></head>
<body>
<h1>{message}</h1>
<div class="accounts">
  <div class="account"><img src="{discord_icon}" alt=""><span>{discord_name}</span></div>
  <div class="account"><img src="{wikidot_icon}" alt=""><span>{wikidot_name}</span></div>
</div>
<p>You can close this window.</p>
</body>
</html>"#,
        discord_name = discord.username,
        wikidot_name = wikidot.username,
    )
}

/// Error page for linking-flow integrity failures.
pub fn error_page(error_code: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Account Linking Failed</title></head>
<body>
<h1>Linking failed</h1>
<p>{error_code}</p>
<p>Please restart the flow from Discord.</p>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_page_carries_both_identities() {
        let discord = DiscordAccount {
            discord_id: 42,
            username: "alice".into(),
            avatar: Some("https://cdn.example.org/a.png".into()),
            created_at: 0,
            updated_at: 0,
        };
        let wikidot = WikidotAccount {
            wikidot_id: 7777,
            username: "alice-wd".into(),
            unix_name: "alice-wd".into(),
            is_site_member: true,
            created_at: 0,
            updated_at: 0,
        };

        let page = success_page("Accounts linked successfully.", &discord, &wikidot);
        assert!(page.contains("alice"));
        assert!(page.contains("alice-wd"));
        assert!(page.contains("avatar.php?userid=7777"));
    }

    #[test]
    fn error_page_names_the_failure() {
        let page = error_page("invalid token");
        assert!(page.contains("invalid token"));
    }
}
