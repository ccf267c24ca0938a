//! Plain-text rendering of core results.

use corrtrack_core::{
    format_timestamp, ActiveView, Contact, ContactInsight, CorrespondenceEntry, Reminder,
    ReminderStatus, Suggestion,
};

const BODY_PREVIEW_CHARS: usize = 200;

pub fn print_contact(contact: &Contact) {
    let preferred = contact
        .preferred_channel
        .as_deref()
        .map(|channel| format!(" | preferred: {channel}"))
        .unwrap_or_default();
    println!("[{}] {}{}", contact.id, contact.name, preferred);
    print_field("email", contact.email.as_deref());
    print_field("phone", contact.phone.as_deref());
    print_field("notes", contact.notes.as_deref());
}

pub fn print_entry(entry: &CorrespondenceEntry) {
    let follow_up = entry
        .follow_up_date
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_else(|| "-".to_string());
    println!(
        "[{}] contact={} {} {} medium={} status={} follow_up={}",
        entry.id,
        entry.contact_id,
        entry.direction,
        format_timestamp(&entry.timestamp),
        entry.medium.as_deref().unwrap_or("-"),
        entry.response_status,
        follow_up
    );
    print_field("subject", entry.subject.as_deref());
    if !entry.tags.is_empty() {
        let tags = entry.tags.iter().cloned().collect::<Vec<_>>().join(", ");
        println!("    tags: {tags}");
    }
    print_field("topic", entry.related_topic.as_deref());
    print_field("sentiment", entry.sentiment.as_deref());
    if let Some(body) = entry.body.as_deref() {
        let preview = body.chars().take(BODY_PREVIEW_CHARS).collect::<String>();
        let ellipsis = if body.chars().count() > BODY_PREVIEW_CHARS {
            "..."
        } else {
            ""
        };
        println!("    body: {preview}{ellipsis}");
    }
}

pub fn print_reminder(reminder: &Reminder) {
    let label = match reminder.status {
        ReminderStatus::Overdue => "OVERDUE",
        ReminderStatus::Pending => "due",
    };
    let due = reminder
        .due()
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_default();
    println!(
        "{label} {due} ({}) -> contact {} (correspondence #{}, subject={})",
        day_phrase(reminder.days_until_due),
        reminder.contact.name,
        reminder.entry.id,
        reminder.entry.subject.as_deref().unwrap_or("-")
    );
}

pub fn print_insight(insight: &ContactInsight) {
    println!("contact: [{}] {}", insight.contact.id, insight.contact.name);
    if insight.total_count == 0 {
        println!("message: No correspondence recorded yet.");
    }
    println!("total_messages: {}", insight.total_count);
    println!("outgoing: {}", insight.outgoing_count);
    println!("incoming: {}", insight.incoming_count);
    if let Some(last) = &insight.last_contact_date {
        println!("last_interaction: {}", format_timestamp(last));
    }
    println!(
        "tone: positive={} negative={} neutral={}",
        insight.tone.positive, insight.tone.negative, insight.tone.neutral
    );
    if let Some(sentiment) = &insight.latest_sentiment {
        println!("latest_sentiment: {sentiment}");
    }
    if let Some(gap) = insight.average_gap_days {
        println!("average_gap_days: {gap:.2}");
    }
    if let Some(date) = &insight.suggested_follow_up_date {
        println!("suggested_follow_up: {}", format_timestamp(date));
    }
    println!("next_action: {}", describe_suggestion(&insight.suggestion));
}

pub fn print_active_view(view: &ActiveView, within_days: i64) {
    if view.recent.is_empty() {
        println!("No active correspondents in the last {within_days} days.");
    }
    for insight in &view.recent {
        print_recency_line(insight);
    }
    if !view.dormant.is_empty() {
        println!("Dormant:");
        for insight in &view.dormant {
            print_recency_line(insight);
        }
    }
    if !view.never_contacted.is_empty() {
        println!("Never contacted:");
        for insight in &view.never_contacted {
            println!("[{}] {}", insight.contact.id, insight.contact.name);
        }
    }
}

fn print_recency_line(insight: &ContactInsight) {
    let last = insight
        .last_contact_date
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_default();
    println!(
        "[{}] {} last={} messages={}",
        insight.contact.id, insight.contact.name, last, insight.total_count
    );
}

fn describe_suggestion(suggestion: &Suggestion) -> String {
    match suggestion {
        Suggestion::FollowUp {
            entry_id,
            due,
            days_until_due,
            ..
        } => format!(
            "follow up on correspondence #{entry_id} (due {}, {})",
            format_timestamp(due),
            day_phrase(*days_until_due)
        ),
        Suggestion::ReachOut {
            days_since_last_contact,
        } => format!("reach out ({days_since_last_contact} days since last contact)"),
        Suggestion::FirstContact => "make first contact".to_string(),
        Suggestion::NoActionNeeded => "no action needed".to_string(),
    }
}

fn day_phrase(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        d if d < 0 => format!("{} days overdue", -d),
        d => format!("in {d} days"),
    }
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("    {label}: {value}");
    }
}
