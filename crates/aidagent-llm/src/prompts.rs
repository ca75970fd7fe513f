use aidagent_types::AlertRecord;

/// Build the crisis-sourcing prompt for one scope.
///
/// The provider is asked for a bare JSON array so the response can be parsed
/// without scraping prose. Non-global scopes are capped to a handful of
/// events to keep scoped refreshes cheap.
pub fn alert_sourcing_prompt(scope: &str) -> String {
    let scope_cap = if scope == aidagent_types::GLOBAL_SCOPE {
        ""
    } else {
        "Include only 3-4 events.\n"
    };

    format!(
        r#"You are AidAgent, an AI system responsible for gathering and organizing crisis-related information.

Task:
Fetch the latest data related to disasters in "{scope}" (e.g., floods, earthquakes, wildfires, conflicts, pandemics, crashes) from reliable public sources such as:
- Government alerts
- International relief organizations (e.g., UN, Red Cross, WHO)
- Public social media updates, APIs and RSS feeds (day-old data is fine)
{scope_cap}
For each crisis event, extract the following:

- type: Type of crisis (e.g., Earthquake, Flood)
- location: Country and region affected
- timestamp: Date and time of the event or last update (ISO format)
- source: Verified source of information
- details: An array of short, factual statements describing the event
- aid_available: List of support options including:
  - type: e.g., food, shelter, medical, evacuation, counseling
  - location_detail: Where the aid is being provided (specific address or area)
  - helpline_number: If available, include an official contact number
- missing_persons_reported: Estimated or confirmed number (if available) as a string

Format the output as a JSON array of such event objects and output nothing else.
It does not need to be real-time data, but it should be the most recent information available.
Sort the events by timestamp in descending order, so the most recent event comes first.

Example output:
[
    {{
        "type": "Flood",
        "location": "Berlin, Germany",
        "timestamp": "2025-06-14T17:00:00Z",
        "source": "Local Government",
        "details": ["Heavy rainfall caused flooding in several districts.", "Emergency services are on alert."],
        "aid_available": [
            {{
                "type": "food",
                "location_detail": "Food Shelter 1, Berlin",
                "helpline_number": "1234"
            }}
        ],
        "missing_persons_reported": "5 missing persons reported"
    }}
]"#
    )
}

/// Build the system preamble grounding the responder in one alert.
///
/// The alert's fields are injected verbatim so the responder answers only
/// from that record, never from its own world knowledge.
pub fn chat_preamble(alert: &AlertRecord) -> String {
    let mut context = String::new();
    context.push_str(&format!("alert_id: {}\n", alert.alert_id));
    context.push_str(&format!("message: {}\n", alert.message));
    if let Some(location) = &alert.location {
        context.push_str(&format!("location: {location}\n"));
    }
    context.push_str(&format!("timestamp: {}\n", alert.timestamp.to_rfc3339()));
    context.push_str(&format!("source: {}\n", alert.source));
    if let Some(missing) = &alert.missing_persons_reported {
        context.push_str(&format!("missing_persons_reported: {missing}\n"));
    }
    if !alert.details.is_empty() {
        context.push_str("details:\n");
        for detail in &alert.details {
            context.push_str(&format!("- {detail}\n"));
        }
    }
    if !alert.aid_available.is_empty() {
        context.push_str("aid_available:\n");
        for offer in &alert.aid_available {
            match &offer.helpline_number {
                Some(helpline) => context.push_str(&format!(
                    "- {} at {} (helpline {})\n",
                    offer.kind, offer.location_detail, helpline
                )),
                None => {
                    context.push_str(&format!("- {} at {}\n", offer.kind, offer.location_detail))
                }
            }
        }
    }

    format!(
        "You are a helpful assistant that provides information about emergency alerts. \
         Answer questions based only on the alert details below. \
         If a question cannot be answered from them, say so instead of guessing.\n\n\
         Alert context:\n{context}"
    )
}
