//! Atom 1.0 serialization.

use super::{FeedEntry, feed_url};
use crate::config::SiteConfig;
use crate::content::Section;
use atom_syndication::{
    Content, Entry, EntryBuilder, Feed, FeedBuilder, FixedDateTime, GeneratorBuilder, Link,
    LinkBuilder, Person, PersonBuilder, Text,
};

/// Render a section's entries as an Atom 1.0 feed.
pub fn render(section: &Section, entries: &[FeedEntry], config: &SiteConfig) -> String {
    let base_url = config.site.base_url_trimmed();
    let section_url = format!("{base_url}{}", section.url);

    // Feed update time is the newest entry; epoch for empty feeds.
    let updated = entries
        .iter()
        .map(|e| e.date.to_rfc3339())
        .max()
        .unwrap_or_else(|| "1970-01-01T00:00:00Z".to_string());
    let updated: FixedDateTime = updated.parse().unwrap_or_else(|_| FixedDateTime::default());

    let author: Person = PersonBuilder::default()
        .name(config.site.author.clone())
        .email(Some(config.site.email.clone()))
        .build();

    let self_link: Link = LinkBuilder::default()
        .href(feed_url(section, config))
        .rel("self".to_string())
        .mime_type(Some("application/atom+xml".to_string()))
        .build();

    let alternate_link: Link = LinkBuilder::default()
        .href(section_url.clone())
        .rel("alternate".to_string())
        .build();

    let feed: Feed = FeedBuilder::default()
        .title(Text::plain(feed_title(section, config)))
        .id(section_url)
        .updated(updated)
        .authors(vec![author])
        .links(vec![self_link, alternate_link])
        .subtitle(Some(Text::plain(config.site.description.clone())))
        .generator(Some(GeneratorBuilder::default().value("kiln").build()))
        .lang(Some(config.site.language.clone()))
        .entries(entries.iter().map(to_entry).collect::<Vec<Entry>>())
        .build();

    feed.to_string()
}

fn to_entry(entry: &FeedEntry) -> Entry {
    let date: FixedDateTime = entry
        .date
        .to_rfc3339()
        .parse()
        .unwrap_or_else(|_| FixedDateTime::default());

    let link: Link = LinkBuilder::default()
        .href(entry.permalink.clone())
        .rel("alternate".to_string())
        .build();

    let content = Content {
        content_type: Some("html".to_string()),
        value: Some(entry.html.clone()),
        ..Content::default()
    };

    EntryBuilder::default()
        .title(Text::plain(entry.title.clone()))
        .id(entry.permalink.clone())
        .updated(date)
        .published(Some(date))
        .links(vec![link])
        .content(Some(content))
        .build()
}

fn feed_title(section: &Section, config: &SiteConfig) -> String {
    if section.name.is_empty() {
        config.site.title.clone()
    } else {
        format!("{} / {}", config.site.title, section.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SectionConfig, test_parse_config};
    use crate::utils::date::DateTimeUtc;

    fn config() -> SiteConfig {
        test_parse_config(
            "[site]\ntitle = \"Site\"\nbase_url = \"https://example.com\"\n\n\
             [feed]\nenable = true\nformat = \"atom\"",
        )
    }

    fn blog() -> Section {
        Section {
            name: "blog".into(),
            url: "/blog/".into(),
            config: SectionConfig::default(),
            pages: vec![],
        }
    }

    #[test]
    fn test_entry_fields() {
        let entries = vec![FeedEntry {
            title: "Hello".into(),
            permalink: "https://example.com/blog/hello/".into(),
            date: DateTimeUtc::from_ymd(2024, 7, 11),
            html: "<p>body</p>".into(),
        }];
        let xml = render(&blog(), &entries, &config());
        assert!(xml.contains("<feed"));
        assert!(xml.contains("Site / blog"));
        assert!(xml.contains("https://example.com/blog/hello/"));
        assert!(xml.contains("2024-07-11"));
        assert!(xml.contains("type=\"html\""));
    }

    #[test]
    fn test_empty_feed_valid() {
        let xml = render(&blog(), &[], &config());
        assert!(xml.contains("<feed"));
        assert!(xml.contains("1970-01-01"));
        assert!(!xml.contains("<entry>"));
    }
}
