//! RSS 2.0 serialization.

use super::{FeedEntry, feed_url};
use crate::config::SiteConfig;
use crate::content::Section;
use anyhow::{Result, anyhow};
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};

/// Render a section's entries as an RSS 2.0 channel.
pub fn render(section: &Section, entries: &[FeedEntry], config: &SiteConfig) -> Result<String> {
    let items: Vec<rss::Item> = entries.iter().map(to_item).collect();

    let channel = ChannelBuilder::default()
        .title(channel_title(section, config))
        .link(format!("{}{}", config.site.base_url_trimmed(), section.url))
        .description(config.site.description.clone())
        .language(Some(config.site.language.clone()))
        .generator(Some("kiln".to_string()))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|err| anyhow!("RSS validation failed for {}: {err}", feed_url(section, config)))?;
    Ok(channel.to_string())
}

fn to_item(entry: &FeedEntry) -> rss::Item {
    ItemBuilder::default()
        .title(Some(entry.title.clone()))
        .link(Some(entry.permalink.clone()))
        .guid(Some(
            GuidBuilder::default()
                .permalink(true)
                .value(entry.permalink.clone())
                .build(),
        ))
        .description(Some(entry.html.clone()))
        .pub_date(Some(entry.date.to_rfc2822()))
        .build()
}

fn channel_title(section: &Section, config: &SiteConfig) -> String {
    if section.name.is_empty() {
        config.site.title.clone()
    } else {
        format!("{} / {}", config.site.title, section.display_name())
    }
}
