use std::fmt::{self, Display, Formatter, Write};

use super::{BrokerDeal, BrokerLookup, BrokerProfile};

const MAX_DEAL_HIGHLIGHTS: usize = 10;

/// Markdown report for one lookup
pub fn render_report(lookup: &BrokerLookup) -> String {
    match lookup {
        BrokerLookup::Found(profile) => ProfileReport(profile).to_string(),
        BrokerLookup::NotFound { name } => {
            format!("No information was found for broker **{}** in the graph.\n", name)
        }
    }
}

struct ProfileReport<'a>(&'a BrokerProfile);

impl Display for ProfileReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let profile = self.0;
        let person = &profile.person;
        let display_name = if person.name.is_empty() {
            &profile.name
        } else {
            &person.name
        };

        writeln!(f, "## Broker Profile: **{}**", display_name)?;
        if !person.title.is_empty() {
            writeln!(f, "**Title:** {}  ", person.title)?;
        }
        if let Some(url) = &person.url {
            writeln!(f, "**Profile:** [View Details]({})  ", url)?;
        }

        writeln!(f, "\n---\n\n### Organizations")?;
        if profile.organizations.is_empty() {
            writeln!(f, "No organization affiliations recorded.")?;
        }
        for org in &profile.organizations {
            let name = org.name.as_deref().unwrap_or("Unnamed organization");
            match &org.kind {
                Some(kind) => writeln!(f, "- **{}** ({})", name, kind)?,
                None => writeln!(f, "- **{}**", name)?,
            }
        }

        writeln!(f, "\n---\n\n### Deal Highlights")?;
        if profile.deals.is_empty() {
            writeln!(f, "No deals recorded.")?;
        }
        for deal in profile.deals.iter().take(MAX_DEAL_HIGHLIGHTS) {
            writeln!(f, "- {}", deal_line(deal))?;
        }
        if profile.deals.len() > MAX_DEAL_HIGHLIGHTS {
            writeln!(
                f,
                "- and {} more",
                profile.deals.len() - MAX_DEAL_HIGHLIGHTS
            )?;
        }

        writeln!(f, "\n---\n\n### Locations")?;
        if profile.locations.is_empty() {
            writeln!(f, "No locations recorded.")?;
        }
        for location in &profile.locations {
            writeln!(f, "- {}", location)?;
        }
        Ok(())
    }
}

fn deal_line(entry: &BrokerDeal) -> String {
    let deal = &entry.deal;
    let subject = deal
        .property_address
        .as_deref()
        .filter(|a| !a.is_empty())
        .unwrap_or(deal.property.as_str());
    let subject = if subject.is_empty() { "unknown property" } else { subject };

    let mut line = match deal.kind.as_deref() {
        Some(kind) => format!("{} of **{}**", capitalize(kind), subject),
        None => format!("Deal at **{}**", subject),
    };
    if let Some(price) = deal.price.as_deref().or(deal.amount.as_deref()) {
        let _ = write!(line, " for **{}**", price);
    }
    if !deal.date.is_empty() {
        let _ = write!(line, " ({})", deal.date);
    }
    if let Some(role) = &deal.role {
        let _ = write!(line, ", role: {}", role);
    }
    line
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
