//! RSS 2.0 writer with the iTunes podcast extensions

use super::channel::Channel;
use super::item::{FeedItem, ENCLOSURE_TYPE};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs;
use std::io::Write;
use std::path::Path;

const ITUNES_NS: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";
const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// A complete feed document
#[derive(Debug, Clone)]
pub struct Feed<'a> {
    pub channel: &'a Channel,

    /// Earliest modification time of the exported tracks
    pub pub_date: Option<DateTime<Utc>>,

    /// Latest modification time of the exported tracks
    pub last_build_date: Option<DateTime<Utc>>,

    pub items: Vec<FeedItem>,
}

impl Feed<'_> {
    /// Serialize to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let xml = self.to_xml()?;
        fs::write(path, xml).with_context(|| format!("Failed to write feed: {:?}", path))?;
        log::debug!("Wrote {} items to {}", self.items.len(), path.display());
        Ok(())
    }

    /// Serialize to an indented XML document
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        writer.write_event(Event::Start(BytesStart::new("rss").with_attributes([
            ("version", "2.0"),
            ("xmlns:itunes", ITUNES_NS),
            ("xmlns:atom", ATOM_NS),
        ])))?;
        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        self.write_channel(&mut writer)?;
        for item in &self.items {
            write_item(&mut writer, item)?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        let mut xml = writer.into_inner();
        xml.push(b'\n');
        Ok(xml)
    }

    fn write_channel<W: Write>(&self, w: &mut Writer<W>) -> Result<()> {
        let c = self.channel;

        text(w, "title", &c.title)?;
        text(w, "link", &c.link)?;
        text(w, "description", &c.description)?;
        text(w, "category", &c.category)?;
        text(w, "copyright", &c.copyright)?;
        text(w, "generator", &c.generator)?;
        text(w, "language", &c.language)?;
        if let Some(date) = self.last_build_date {
            text(w, "lastBuildDate", &date.to_rfc2822())?;
        }
        text(w, "managingEditor", &c.managing_editor)?;
        if let Some(date) = self.pub_date {
            text(w, "pubDate", &date.to_rfc2822())?;
        }
        if let Some(ttl) = c.ttl {
            text(w, "ttl", &ttl.to_string())?;
        }
        text(w, "webMaster", &c.web_master)?;

        if !c.image_url.is_empty() {
            w.write_event(Event::Start(BytesStart::new("image")))?;
            text(w, "url", &c.image_url)?;
            text(w, "title", &c.title)?;
            text(w, "link", &c.link)?;
            w.write_event(Event::End(BytesEnd::new("image")))?;
        }

        if !c.new_feed_url.is_empty() {
            w.write_event(Event::Empty(BytesStart::new("atom:link").with_attributes([
                ("href", c.new_feed_url.as_str()),
                ("rel", "self"),
                ("type", "application/rss+xml"),
            ])))?;
        }

        text(w, "itunes:author", &c.author)?;
        text(w, "itunes:subtitle", &c.subtitle)?;
        text(w, "itunes:summary", &c.summary)?;
        text(w, "itunes:block", &c.block)?;
        if !c.image_url.is_empty() {
            empty(w, "itunes:image", &[("href", c.image_url.as_str())])?;
        }
        text(w, "itunes:explicit", &c.explicit)?;
        text(w, "itunes:complete", &c.complete)?;
        text(w, "itunes:new-feed-url", &c.new_feed_url)?;

        if !c.owner_name.is_empty() || !c.owner_email.is_empty() {
            w.write_event(Event::Start(BytesStart::new("itunes:owner")))?;
            text(w, "itunes:name", &c.owner_name)?;
            text(w, "itunes:email", &c.owner_email)?;
            w.write_event(Event::End(BytesEnd::new("itunes:owner")))?;
        }

        if !c.category.is_empty() {
            let start = BytesStart::new("itunes:category").with_attributes([("text", c.category.as_str())]);
            match &c.subcategory {
                Some(sub) => {
                    w.write_event(Event::Start(start))?;
                    empty(w, "itunes:category", &[("text", sub.as_str())])?;
                    w.write_event(Event::End(BytesEnd::new("itunes:category")))?;
                }
                None => w.write_event(Event::Empty(start))?,
            }
        }

        Ok(())
    }
}

fn write_item<W: Write>(w: &mut Writer<W>, item: &FeedItem) -> Result<()> {
    w.write_event(Event::Start(BytesStart::new("item")))?;

    text(w, "guid", &item.enclosure_url)?;
    text(w, "title", &item.title)?;
    text(w, "link", &item.enclosure_url)?;
    text(w, "description", &item.description)?;
    text(w, "pubDate", &item.pub_date.to_rfc2822())?;
    let length = item.length.to_string();
    empty(
        w,
        "enclosure",
        &[
            ("url", item.enclosure_url.as_str()),
            ("length", length.as_str()),
            ("type", ENCLOSURE_TYPE),
        ],
    )?;
    text(w, "itunes:author", &item.author)?;
    text(w, "itunes:subtitle", &item.subtitle)?;
    text(w, "itunes:summary", &item.summary)?;
    if !item.image_url.is_empty() {
        empty(w, "itunes:image", &[("href", item.image_url.as_str())])?;
    }
    if let Some(duration) = &item.duration {
        text(w, "itunes:duration", duration)?;
    }

    w.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

/// `<name>value</name>`, skipped when `value` is empty
fn text<W: Write>(w: &mut Writer<W>, name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(value)))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn empty<W: Write>(w: &mut Writer<W>, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
    w.write_event(Event::Empty(element))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> Channel {
        Channel {
            title: "Show & Tell".to_string(),
            link: "https://example.com/".to_string(),
            description: "A show".to_string(),
            category: "Arts".to_string(),
            subcategory: Some("Books".to_string()),
            language: "en-us".to_string(),
            ttl: Some(1),
            author: "Jane".to_string(),
            explicit: "no".to_string(),
            image_url: "https://example.com/default.jpg".to_string(),
            new_feed_url: "https://example.com/feed.xml".to_string(),
            owner_name: "Jane".to_string(),
            owner_email: "jane@example.com".to_string(),
            ..Channel::default()
        }
    }

    fn item(title: &str, url: &str) -> FeedItem {
        FeedItem {
            title: title.to_string(),
            description: title.to_string(),
            subtitle: String::new(),
            summary: String::new(),
            author: "Jane".to_string(),
            pub_date: DateTime::from_timestamp(1_000_000_000, 0).unwrap(),
            duration: Some("00:03:00".to_string()),
            image_url: String::new(),
            enclosure_url: url.to_string(),
            length: 4096,
        }
    }

    fn render(feed: &Feed) -> String {
        String::from_utf8(feed.to_xml().unwrap()).unwrap()
    }

    #[test]
    fn test_channel_elements() {
        let channel = channel();
        let date = DateTime::from_timestamp(1_600_000_000, 0);
        let xml = render(&Feed {
            channel: &channel,
            pub_date: date,
            last_build_date: date,
            items: Vec::new(),
        });

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(&format!("xmlns:itunes=\"{}\"", ITUNES_NS)));
        assert!(xml.contains("<title>Show &amp; Tell</title>"));
        assert!(xml.contains("13 Sep 2020 12:26:40 +0000</pubDate>"));
        assert!(xml.contains("<ttl>1</ttl>"));
        assert!(xml.contains(
            "<atom:link href=\"https://example.com/feed.xml\" rel=\"self\" type=\"application/rss+xml\"/>"
        ));
        assert!(xml.contains("<itunes:category text=\"Arts\">"));
        assert!(xml.contains("<itunes:category text=\"Books\"/>"));
        assert!(xml.contains("<itunes:email>jane@example.com</itunes:email>"));
        assert!(!xml.contains("<item>"));
        // Empty values are not written
        assert!(!xml.contains("<copyright>"));
    }

    #[test]
    fn test_items_in_order() {
        let channel = channel();
        let xml = render(&Feed {
            channel: &channel,
            pub_date: None,
            last_build_date: None,
            items: vec![
                item("First", "https://example.com/1.mp3"),
                item("Second", "https://example.com/2.mp3"),
            ],
        });

        let first = xml.find("<title>First</title>").unwrap();
        let second = xml.find("<title>Second</title>").unwrap();
        assert!(first < second);
        assert!(xml.contains(
            "<enclosure url=\"https://example.com/1.mp3\" length=\"4096\" type=\"audio/mpeg\"/>"
        ));
        assert!(xml.contains("<itunes:duration>00:03:00</itunes:duration>"));
        assert!(xml.contains("<guid>https://example.com/2.mp3</guid>"));
        assert!(!xml.contains("<lastBuildDate>"));
    }
}
