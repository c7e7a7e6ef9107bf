//! Server-rendered HTML for the public event pages.

use crate::models::Event;

pub mod event_card;

pub use event_card::EventCard;

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
</head>
<body>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape_html(title),
        body = body,
    )
}

/// Listing of every event as a card.
pub fn events_page(events: &[Event]) -> String {
    let body = if events.is_empty() {
        "<p>No events yet.</p>".to_string()
    } else {
        let cards: Vec<String> = events
            .iter()
            .map(|event| format!("<li>{}</li>", EventCard::from(event).render()))
            .collect();
        format!("<ul class=\"events\">\n{}\n</ul>", cards.join("\n"))
    };

    layout("Featured Events", &format!("<h1>Featured Events</h1>\n{body}"))
}

pub fn event_page(event: &Event) -> String {
    let body = format!(
        r#"<article id="event">
  <h1>{title}</h1>
  <p class="description">{description}</p>
  <img src="{image}" alt="{title}" width="800" height="800" class="banner">
  <section>
    <h2>Overview</h2>
    <p>{overview}</p>
  </section>
  <section>
    <h2>Event Details</h2>
    <p>Date: {date}</p>
    <p>Time: {time}</p>
    <p>Venue: {venue}, {location}</p>
    <p>Mode: {mode}</p>
    <p>Audience: {audience}</p>
  </section>
  <section>
    <h2>Agenda</h2>
    <ul>{agenda}</ul>
  </section>
  <section>
    <h2>About the Organizer</h2>
    <p>{organizer}</p>
  </section>
  <ul class="tags">{tags}</ul>
</article>"#,
        title = escape_html(&event.title),
        description = escape_html(&event.description),
        image = escape_html(&event.image),
        overview = escape_html(&event.overview),
        date = escape_html(&event.date),
        time = escape_html(&event.time),
        venue = escape_html(&event.venue),
        location = escape_html(&event.location),
        mode = escape_html(&event.mode),
        audience = escape_html(&event.audience),
        agenda = list_items(&event.agenda),
        organizer = escape_html(&event.organizer),
        tags = list_items(&event.tags),
    );

    layout(&event.title, &body)
}

fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect()
}

pub fn not_found_page() -> String {
    layout(
        "Event not found",
        r#"<h1>Event not found</h1>
<p><a href="/">Back to all events</a></p>"#,
    )
}
