//! Operator notification rendering.
//!
//! Pure functions: a stored record in, subject and bodies out. The HTML body
//! comes from `templates/notification.html`, which escapes every value.

use askama::Template;
use html_escape::encode_text;
use tracing::warn;

use crate::model::record::StoredRecord;
use crate::model::submission::{BusinessLead, ContactMessage, QuoteRequest, Submission};

const FOOTER_ADDRESS: &str = "Batimove Sarl | Rue de Monthoux 64, 1201 Genève";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotification {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    /// Address the operator's reply should go to, when it is not the sender.
    pub reply_to: Option<String>,
}

pub fn render(record: &StoredRecord) -> RenderedNotification {
    match &record.submission {
        Submission::Quote(quote) => render_quote(record, quote),
        Submission::Contact(message) => render_contact(record, message),
        Submission::Business(lead) => render_business(record, lead),
    }
}

/// One labelled line in both bodies, optionally linked in the HTML one.
struct Row {
    label: &'static str,
    value: String,
    href: Option<String>,
}

impl Row {
    fn plain(label: &'static str, value: impl Into<String>) -> Self {
        Row { label, value: value.into(), href: None }
    }

    fn mailto(label: &'static str, email: &str) -> Self {
        Row { label, value: email.to_string(), href: Some(format!("mailto:{}", email)) }
    }

    fn tel(label: &'static str, phone: &str) -> Self {
        Row { label, value: phone.to_string(), href: Some(format!("tel:{}", phone)) }
    }
}

struct Section {
    title: &'static str,
    rows: Vec<Row>,
}

/// Free-form submitter text shown in its own box.
struct FreeText<'a> {
    title: &'a str,
    body: &'a str,
}

/// HTML body. Every interpolated value is HTML-escaped by the template.
#[derive(Template)]
#[template(path = "notification.html")]
struct HtmlNotification<'a> {
    heading: &'a str,
    badge: &'a str,
    sections: &'a [Section],
    free_text: Option<FreeText<'a>>,
    action: &'a str,
    footer: &'a str,
    reference: &'a str,
}

fn render_quote(record: &StoredRecord, quote: &QuoteRequest) -> RenderedNotification {
    let service = quote.service_id.display_name();
    let contact = &quote.contact;

    let mut details = vec![Row::plain("Service", service), Row::plain("Date souhaitée", &quote.date)];
    if let (Some(from), Some(to)) = (&quote.from_zip, &quote.to_zip) {
        details.push(Row::plain("NPA Départ", from));
        details.push(Row::plain("NPA Arrivée", to));
    }
    if let Some(volume) = quote.volume {
        details.push(Row::plain("Volume", format!("{} m³", volume)));
    }
    if let Some(rooms) = quote.rooms {
        details.push(Row::plain("Nombre de pièces", rooms.to_string()));
    }
    if let Some(surface) = quote.surface {
        details.push(Row::plain("Surface", format!("{} m²", surface)));
    }
    if let Some(housing) = quote.housing_type.as_deref().filter(|h| !h.is_empty()) {
        details.push(Row::plain("Type de bien", capitalize(housing)));
    }
    if let Some(floor) = quote.floor {
        details.push(Row::plain("Étage", floor.to_string()));
    }
    if let Some(duration) = quote.duration.as_deref().filter(|d| !d.is_empty()) {
        details.push(Row::plain("Durée", duration));
    }

    let sections = [
        Section {
            title: "📋 Informations Client",
            rows: vec![
                Row::plain("Nom", &contact.name),
                Row::mailto("Email", &contact.email),
                Row::tel("Téléphone", &contact.phone),
            ],
        },
        Section { title: "📦 Détails du Service", rows: details },
    ];

    finish(
        format!("🚚 Nouveau Devis: {} - {}", service, contact.name),
        "🚚 Nouvelle Demande de Devis",
        service,
        record,
        &sections,
        None,
        "Contactez ce client sous 24h pour établir un devis personnalisé.",
        None,
    )
}

fn render_contact(record: &StoredRecord, message: &ContactMessage) -> RenderedNotification {
    let sections = [Section {
        title: "👤 Informations de Contact",
        rows: vec![
            Row::plain("Nom", &message.name),
            Row::mailto("Email", &message.email),
            Row::plain("Sujet", &message.subject),
        ],
    }];

    finish(
        format!("💬 Contact: {} - {}", message.subject, message.name),
        "💬 Nouveau Message de Contact",
        &message.subject,
        record,
        &sections,
        Some(("📝 Message", message.message.as_str())),
        "Répondez à ce message sous 24h.",
        Some(message.email.clone()),
    )
}

fn render_business(record: &StoredRecord, lead: &BusinessLead) -> RenderedNotification {
    let mut rows = vec![
        Row::plain("Entreprise", &lead.company_name),
        Row::plain("Contact", &lead.contact_name),
        Row::mailto("Email", &lead.email),
        Row::tel("Téléphone", &lead.phone),
    ];
    if let Some(count) = lead.employee_count.as_deref().filter(|c| !c.is_empty()) {
        rows.push(Row::plain("Employés", count));
    }
    let sections = [Section { title: "🏢 Informations Entreprise", rows }];

    finish(
        format!("🏢 Nouveau Lead B2B: {} - {}", lead.company_name, lead.contact_name),
        "🏢 Nouveau Lead B2B",
        &lead.company_name,
        record,
        &sections,
        Some(("🎯 Besoins", lead.service_needs.as_str())),
        "Contactez ce prospect sous 48h pour discuter de ses besoins.",
        None,
    )
}

#[allow(clippy::too_many_arguments)]
fn finish(
    subject: String,
    heading: &str,
    badge: &str,
    record: &StoredRecord,
    sections: &[Section],
    free_text: Option<(&str, &str)>,
    action: &str,
    reply_to: Option<String>,
) -> RenderedNotification {
    let reference = format!("Référence: {} ({})", record.id, record.created_at.to_rfc3339());

    let mut text_body = format!("{}\n\n", heading);
    for section in sections {
        text_body.push_str(&format!("{}\n", section.title));
        for row in &section.rows {
            text_body.push_str(&format!("  {}: {}\n", row.label, row.value));
        }
        text_body.push('\n');
    }
    if let Some((title, body)) = free_text {
        text_body.push_str(&format!("{}\n{}\n\n", title, body));
    }
    text_body.push_str(&format!("Action requise: {}\n\n{}\n{}\n", action, reference, FOOTER_ADDRESS));

    let page = HtmlNotification {
        heading,
        badge,
        sections,
        free_text: free_text.map(|(title, body)| FreeText { title, body }),
        action,
        footer: FOOTER_ADDRESS,
        reference: &reference,
    };
    let html_body = match page.render() {
        Ok(html) => html,
        Err(e) => {
            warn!("Notification template failed, sending preformatted text instead: {}", e);
            format!("<pre>{}</pre>", encode_text(&text_body))
        }
    };

    RenderedNotification { subject, text_body, html_body, reply_to }
}

/// First character uppercased, the rest lowercased.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
