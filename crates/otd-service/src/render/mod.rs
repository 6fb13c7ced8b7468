//! Server-side HTML rendering for the per-date pages.
//!
//! Rendering is literal placeholder substitution over a fixed template:
//! every `{{NAME}}` token with a computed value is replaced, anything
//! else is left verbatim. Events are truncated to the first 10 and
//! people lists to the first 6, in store order.

use chrono::Datelike;
use common::datekey::DateKey;
use common::locale::{self, Locale};
use common::record::{Event, HistoryRecord, Person};

/// The per-date page template compiled into the binary.
pub const PAGE_TEMPLATE: &str = include_str!("../../templates/history.html");

/// Events shown on a server-rendered page.
const MAX_EVENTS: usize = 10;

/// People shown per section on a server-rendered page.
const MAX_PEOPLE: usize = 6;

/// Page metadata derived from a date and its record.
#[derive(Debug)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub date_display: String,
}

/// Human date display: `8月24日` / `AUGUST 24`.
#[must_use]
pub fn date_display(key: DateKey, locale: Locale) -> String {
    match locale {
        Locale::ZhCn => format!("{}月{}日", key.month(), key.day()),
        Locale::EnUs => {
            let month = locale::month_name(locale, key.month()).unwrap_or_default();
            format!("{} {}", month.to_uppercase(), key.day())
        }
    }
}

/// The dated subtitle line, weekday included when the key names a real
/// calendar day.
#[must_use]
pub fn subtitle(key: DateKey, locale: Locale) -> String {
    let Some(date) = key.to_reference_date() else {
        // Days like 02-30 pass validation but have no weekday
        return date_display(key, locale);
    };
    let weekday = locale::weekday_name(locale, date.weekday().num_days_from_sunday())
        .unwrap_or_default();
    let year = date.year();

    match locale {
        Locale::ZhCn => format!("今天是{}年{}月{}日，{}", year, key.month(), key.day(), weekday),
        Locale::EnUs => {
            let month = locale::month_name(locale, key.month()).unwrap_or_default();
            format!("Today is {}, {} {}, {}", weekday, month, key.day(), year)
        }
    }
}

/// Title/description/keywords for the page head.
#[must_use]
pub fn page_metadata(key: DateKey, record: &HistoryRecord, locale: Locale) -> PageMetadata {
    let display = date_display(key, locale);
    let totals = record.totals();

    let (title, description, keywords) = match locale {
        Locale::ZhCn => (
            format!("{display} - 历史上的今天 | OnThisDay"),
            format!(
                "{display}历史上发生的重要事件，包含{}个历史事件、{}位名人生日、{}位名人逝世信息。探索历史，发现精彩。",
                totals.events, totals.birthdays, totals.deaths
            ),
            format!(
                "{display}, 历史事件, 名人生日, 历史上的今天, 历史, {}月{}日",
                key.month(),
                key.day()
            ),
        ),
        Locale::EnUs => {
            let month = locale::month_name(locale, key.month()).unwrap_or_default();
            (
                format!("{display} - Today in History | OnThisDay"),
                format!(
                    "Important historical events that happened on {display}, including {} historical events, {} famous birthdays, and {} notable deaths. Explore history, discover the extraordinary.",
                    totals.events, totals.birthdays, totals.deaths
                ),
                format!(
                    "{display}, historical events, famous birthdays, today in history, history, {} {}",
                    month,
                    key.day()
                ),
            )
        }
    };

    PageMetadata {
        title,
        description,
        keywords,
        date_display: display,
    }
}

/// Render the events timeline fragment, first [`MAX_EVENTS`] entries.
#[must_use]
pub fn render_events(events: &[Event], locale: Locale) -> String {
    if events.is_empty() {
        return no_data_fragment(locale);
    }

    events
        .iter()
        .take(MAX_EVENTS)
        .map(|event| {
            let description = event.description.resolve(locale);
            let image_block = event.image.as_deref().map_or_else(String::new, |url| {
                format!(
                    r#"
                <div class="event-image">
                    <img src="{url}" alt="{description}" loading="lazy">
                </div>"#
                )
            });

            format!(
                r#"
        <div class="timeline-event">
            <span class="event-year">{}</span>
            <div class="event-content">
                <p class="event-description">{description}</p>{image_block}
            </div>
        </div>"#,
                event.year
            )
        })
        .collect()
}

/// Render a people fragment (birthdays or deaths), first [`MAX_PEOPLE`]
/// entries.
#[must_use]
pub fn render_people(people: &[Person], locale: Locale) -> String {
    if people.is_empty() {
        return no_data_fragment(locale);
    }

    people
        .iter()
        .take(MAX_PEOPLE)
        .map(|person| {
            let name = person.name.resolve(locale);
            let description = person.description.resolve(locale);
            let image_block = person.image.as_deref().map_or_else(String::new, |url| {
                format!(
                    r#"
            <div class="person-image">
                <img src="{url}" alt="{name}" loading="lazy">
            </div>"#
                )
            });

            format!(
                r#"
        <div class="person-card">{image_block}
            <div class="person-info">
                <h4 class="person-name">{name}</h4>
                <p class="person-years">{}</p>
                <p class="person-description">{description}</p>
            </div>
        </div>"#,
                person.years
            )
        })
        .collect()
}

fn no_data_fragment(locale: Locale) -> String {
    format!(
        r#"<p class="no-data">{}</p>"#,
        locale::no_data_text(locale)
    )
}

/// Render the full page for a date.
///
/// `seo_slug` is the `MonthName-DD` path segment the page was requested
/// under; it feeds the canonical URL and the `CURRENT_DATE` marker.
#[must_use]
pub fn render_page(
    template: &str,
    seo_slug: &str,
    key: DateKey,
    record: &HistoryRecord,
    locale: Locale,
    base_url: &str,
) -> String {
    let metadata = page_metadata(key, record, locale);

    let date_iso = key.to_reference_date().map_or_else(
        || format!("2024-{key}"),
        |date| date.format("%Y-%m-%d").to_string(),
    );

    let page_url = format!("{base_url}/history/{seo_slug}/");
    let page_url_en = format!("{page_url}?lang=en-US");
    let page_image = record
        .events
        .first()
        .and_then(|event| event.image.clone())
        .unwrap_or_else(|| format!("{base_url}/og-image.jpg"));

    let events_ssr = render_events(&record.events, locale);
    let birthdays_ssr = render_people(&record.birthdays, locale);
    let deaths_ssr = render_people(&record.deaths, locale);
    let ssr_content = format!("{events_ssr}{birthdays_ssr}{deaths_ssr}");

    template
        .replace("{{PAGE_TITLE}}", &metadata.title)
        .replace("{{PAGE_DESCRIPTION}}", &metadata.description)
        .replace("{{PAGE_KEYWORDS}}", &metadata.keywords)
        .replace("{{PAGE_URL}}", &page_url)
        .replace("{{PAGE_URL_EN}}", &page_url_en)
        .replace("{{PAGE_IMAGE}}", &page_image)
        .replace("{{DATE_ISO}}", &date_iso)
        .replace("{{DATE_DISPLAY}}", &metadata.date_display)
        .replace("{{DATE_SUBTITLE}}", &subtitle(key, locale))
        .replace("{{CURRENT_DATE}}", seo_slug)
        .replace("{{CURRENT_LANG}}", locale.as_str())
        .replace("{{HISTORY_EVENTS_SSR}}", &events_ssr)
        .replace("{{FAMOUS_BIRTHDAYS_SSR}}", &birthdays_ssr)
        .replace("{{FAMOUS_DEATHS_SSR}}", &deaths_ssr)
        .replace("{{SSR_CONTENT}}", &ssr_content)
}
