use crate::models::Event;
use crate::views::escape_html;

/// Summary of one event, rendered as a link to its detail page.
#[derive(Debug, Clone, Copy)]
pub struct EventCard<'a> {
    pub title: &'a str,
    pub image: &'a str,
    pub slug: &'a str,
    pub location: &'a str,
    pub date: &'a str,
    pub time: &'a str,
}

impl<'a> From<&'a Event> for EventCard<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            title: &event.title,
            image: &event.image,
            slug: &event.slug,
            location: &event.location,
            date: &event.date,
            time: &event.time,
        }
    }
}

impl EventCard<'_> {
    pub fn href(&self) -> String {
        format!("/events/{}", self.slug)
    }

    pub fn render(&self) -> String {
        let title = escape_html(self.title);
        format!(
            r#"<a href="{href}" id="event-card">
  <img src="{image}" alt="{title}" width="420" height="300" class="poster">
  <div class="location">
    <img src="/icons/pin.svg" alt="location" width="14" height="14">
    <p>{location}</p>
  </div>
  <p class="title">{title}</p>
  <div class="datetime">
    <div>
      <img src="/icons/calendar.svg" alt="date" width="14" height="14">
      <p>{date}</p>
    </div>
    <div>
      <img src="/icons/clock.svg" alt="time" width="14" height="14">
      <p>{time}</p>
    </div>
  </div>
</a>"#,
            href = escape_html(&self.href()),
            image = escape_html(self.image),
            title = title,
            location = escape_html(self.location),
            date = escape_html(self.date),
            time = escape_html(self.time),
        )
    }
}
