//! User-facing prompt text
//!
//! Pure functions so the wording stays unit-testable and the router stays
//! free of string assembly.

use locket_core::{ChannelId, ContentId, ContentRecord};
use locket_delivery::DeliveryReport;
use locket_registry::RegistryStats;

/// Deep link that requests delivery of a specific item. Also the shape of
/// generated share references.
pub fn share_link(bot_username: &str, id: &ContentId) -> String {
    format!("https://t.me/{bot_username}?start={id}")
}

pub fn join_link(channel: &ChannelId) -> String {
    format!("https://t.me/{}", channel.bare())
}

/// Re-engagement prompt for a denied actor: join instructions plus a retry
/// affordance, never a bare error.
pub fn join_prompt(channel: &ChannelId, bot_username: &str, deep_arg: Option<&ContentId>) -> String {
    let retry = match deep_arg {
        Some(id) => share_link(bot_username, id),
        None => format!("https://t.me/{bot_username}"),
    };
    format!(
        "Subscription required.\n\n\
         To access this content, join our channel first:\n{}\n\n\
         1. Join the channel\n\
         2. Come back and press \"I've joined\" (or open {})",
        join_link(channel),
        retry,
    )
}

pub fn welcome_operator() -> String {
    "Welcome, operator.\n\n\
     Commands:\n\
     /additem - register a new item\n\
     /listitems - recent items\n\
     /stats - registry statistics\n\
     /checkaccess - membership diagnostic\n\
     /broadcast - mass notification"
        .to_string()
}

pub fn welcome_member() -> String {
    "Welcome! You're all set.\n\
     Open any shared link to receive its content."
        .to_string()
}

pub fn submission_started() -> String {
    "Item submission started.\n\nStep 1/3: send the item title.".to_string()
}

pub fn title_saved() -> String {
    "Title saved.\n\nStep 2/3: send the poster image.".to_string()
}

pub fn poster_saved() -> String {
    "Poster received.\n\n\
     Step 3/3: send the files (video, document, audio, or image), one by one."
        .to_string()
}

/// Choice prompt after each collected file. Never auto-finishes.
pub fn asset_collected(count: usize, kind: &str) -> String {
    format!(
        "File #{count} added ({kind}). Total: {count}.\n\n\
         Next: finish, add more, or cancel."
    )
}

pub fn submission_committed(title: &str, files: usize, link: &str) -> String {
    format!(
        "Item registered.\n\nTitle: {title}\nFiles: {files}\nLink: {link}\n\n\
         Share this link in the channel."
    )
}

pub fn empty_submission() -> String {
    "No files added yet. Send at least one file before finishing.".to_string()
}

pub fn delivery_summary(title: &str, report: &DeliveryReport) -> String {
    if report.failed == 0 {
        format!(
            "Delivered {} file(s) of {title}. Enjoy!",
            report.sent
        )
    } else {
        format!(
            "Delivered {} of {} file(s) of {title} ({} failed). \
             Open the link again to retry.",
            report.sent, report.requested, report.failed
        )
    }
}

pub fn stats_summary(stats: &RegistryStats, privileged: usize, channel: &ChannelId) -> String {
    format!(
        "Registry statistics\n\n\
         Items: {}\nAssets: {}\nOperators: {privileged}\nChannel: {channel}",
        stats.records, stats.assets,
    )
}

pub fn recent_listing(records: &[ContentRecord]) -> String {
    if records.is_empty() {
        return "No items stored yet.".to_string();
    }
    let mut out = String::from("Recent items:\n\n");
    for record in records {
        out.push_str(&format!(
            "- {} ({} files)\n  id: {}\n",
            record.title,
            record.assets.len(),
            record.id
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_link_shape() {
        let link = share_link("locket_bot", &ContentId::from("42"));
        assert_eq!(link, "https://t.me/locket_bot?start=42");
    }

    #[test]
    fn test_join_prompt_carries_retry_deep_link() {
        let channel = ChannelId::new("@movies");
        let prompt = join_prompt(&channel, "locket_bot", Some(&ContentId::from("42")));
        assert!(prompt.contains("https://t.me/movies"));
        assert!(prompt.contains("https://t.me/locket_bot?start=42"));
    }

    #[test]
    fn test_delivery_summary_honest_counts() {
        let summary = delivery_summary(
            "Movie X",
            &DeliveryReport {
                requested: 5,
                sent: 2,
                failed: 3,
            },
        );
        assert!(summary.contains("2 of 5"));
        assert!(summary.contains("3 failed"));
    }
}
