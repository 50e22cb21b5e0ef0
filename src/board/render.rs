//! Builds the list cards and selection options from an [`ActivitySet`] and
//! renders them to markup.

use leptos::prelude::*;

use super::dispatch::{ClickTarget, DELETE_MARKER};
use super::markup::escape_html;
use crate::models::ActivitySet;

pub const LOADING_MESSAGE: &str = "Loading activities...";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load activities. Please try again later.";
pub const NO_PARTICIPANTS_MESSAGE: &str = "No participants yet";
pub const PLACEHOLDER_OPTION: &str = "-- Select an activity --";

/// Contents of the activities list container.
#[derive(Debug, Clone, PartialEq)]
pub enum ListArea {
    Loading,
    Cards(Vec<ActivityCard>),
    LoadFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub spots_left: i64,
    pub participants: Vec<ParticipantItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantItem {
    pub email: String,
    pub remove: RemoveControl,
}

/// The removal control embedded in a participant item. Its context lives in
/// attributes so a single delegated handler can recover it.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveControl {
    pub activity: String,
    pub email: String,
}

impl RemoveControl {
    pub fn attributes(&self) -> [(&'static str, &str); 2] {
        [("activity", self.activity.as_str()), ("email", self.email.as_str())]
    }

    /// What the delegated handler sees when this control is clicked.
    pub fn click_target(&self) -> ClickTarget {
        self.attributes()
            .into_iter()
            .fold(ClickTarget::new(&[DELETE_MARKER]), |target, (key, value)| {
                target.with_data(key, value)
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn placeholder() -> Self {
        Self {
            value: String::new(),
            label: PLACEHOLDER_OPTION.to_string(),
        }
    }
}

pub fn build_cards(set: &ActivitySet) -> Vec<ActivityCard> {
    set.iter()
        .map(|(name, details)| ActivityCard {
            name: name.to_string(),
            description: details.description.clone(),
            schedule: details.schedule.clone(),
            spots_left: details.spots_left(),
            participants: details
                .participants
                .iter()
                .map(|email| ParticipantItem {
                    email: email.clone(),
                    remove: RemoveControl {
                        activity: name.to_string(),
                        email: email.clone(),
                    },
                })
                .collect(),
        })
        .collect()
}

/// Placeholder first, then one option per activity in server order.
pub fn build_options(set: &ActivitySet) -> Vec<SelectOption> {
    std::iter::once(SelectOption::placeholder())
        .chain(set.iter().map(|(name, _)| SelectOption {
            value: name.to_string(),
            label: name.to_string(),
        }))
        .collect()
}

pub fn render_list(list: &ListArea) -> String {
    match list {
        ListArea::Loading => view! { <p class="status">{LOADING_MESSAGE}</p> }.to_html(),
        ListArea::LoadFailed => {
            view! { <p class="status error">{LOAD_FAILED_MESSAGE}</p> }.to_html()
        }
        ListArea::Cards(cards) => cards.iter().map(render_card).collect(),
    }
}

pub fn render_card(card: &ActivityCard) -> String {
    let name = escape_html(&card.name);
    let description = escape_html(&card.description);
    let schedule = escape_html(&card.schedule);
    let spots = format!("{} spots left", card.spots_left);
    let participants_html = render_participants(&card.participants);

    view! {
        <div class="activity-card">
            <h4 inner_html=name />
            <p inner_html=description />
            <p><strong>"Schedule: "</strong><span inner_html=schedule /></p>
            <p><strong>"Availability: "</strong>{spots}</p>
            <div class="participants-section">
                <h5>"Participants"</h5>
                <div inner_html=participants_html />
            </div>
        </div>
    }
    .to_html()
}

fn render_participants(participants: &[ParticipantItem]) -> String {
    if participants.is_empty() {
        return view! { <p class="no-participants">{NO_PARTICIPANTS_MESSAGE}</p> }.to_html();
    }

    let items: String = participants.iter().map(render_participant).collect();
    view! { <ul class="participants-list" inner_html=items /> }.to_html()
}

fn render_participant(item: &ParticipantItem) -> String {
    let email = escape_html(&item.email);
    let remove_html = render_remove_control(&item.remove);

    view! {
        <li class="participant-item">
            <span class="participant-email" inner_html=email />
            <form class="delete-form" method="post" action="/click" inner_html=remove_html />
        </li>
    }
    .to_html()
}

/// Hidden inputs post the control's marker and attributes to the delegated
/// click route. The button carries the same attributes as `data-*`.
fn render_remove_control(control: &RemoveControl) -> String {
    let mut data_attrs = String::new();
    let mut fields = format!(r#"<input type="hidden" name="marker" value="{DELETE_MARKER}">"#);
    for (key, value) in control.attributes() {
        let value = escape_html(value);
        data_attrs.push_str(&format!(r#" data-{key}="{value}""#));
        fields.push_str(&format!(
            r#"<input type="hidden" name="data-{key}" value="{value}">"#
        ));
    }
    fields.push_str(&format!(
        r#"<button type="submit" class="{DELETE_MARKER}"{data_attrs} title="Unregister">&#10006;</button>"#
    ));
    fields
}

/// Option tags for the activity select; `selected` marks the matching value.
pub fn render_options(options: &[SelectOption], selected: &str) -> String {
    options
        .iter()
        .map(|opt| {
            let mark = if !opt.value.is_empty() && opt.value == selected {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape_html(&opt.value),
                mark,
                escape_html(&opt.label)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityDetails;

    fn details(max: i64, participants: &[&str]) -> ActivityDetails {
        ActivityDetails {
            description: "Learn strategies".to_string(),
            schedule: "Fridays, 3:30 PM - 5:00 PM".to_string(),
            max_participants: max,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn sample() -> ActivitySet {
        vec![
            ("Chess Club".to_string(), details(12, &["michael@mergington.edu", "daniel@mergington.edu"])),
            ("Gym Class".to_string(), details(1, &["a@x.com", "b@x.com", "c@x.com"])),
            ("Art Club".to_string(), details(15, &[])),
        ]
        .into_iter()
        .collect()
    }

    /// Reads an attribute back the way a browser would, undoing `escape_html`.
    fn read_attr(markup: &str, name: &str) -> Option<String> {
        let start = markup.find(&format!(r#"{name}=""#))? + name.len() + 2;
        let end = start + markup[start..].find('"')?;
        Some(
            markup[start..end]
                .replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace("&quot;", "\"")
                .replace("&#039;", "'")
                .replace("&amp;", "&"),
        )
    }

    #[test]
    fn test_one_card_per_activity_with_unclamped_spots() {
        let set = sample();
        let cards = build_cards(&set);
        assert_eq!(cards.len(), set.len());
        for (card, (name, details)) in cards.iter().zip(set.iter()) {
            assert_eq!(card.name, name);
            assert_eq!(card.spots_left, details.max_participants - details.participants.len() as i64);
        }
        assert_eq!(cards[1].spots_left, -2);
    }

    #[test]
    fn test_remove_controls_carry_activity_and_email() {
        let cards = build_cards(&sample());
        let target = cards[0].participants[1].remove.click_target();
        assert_eq!(target.data("activity"), Some("Chess Club"));
        assert_eq!(target.data("email"), Some("daniel@mergington.edu"));
        assert_eq!(target.classes, vec![DELETE_MARKER.to_string()]);
    }

    #[test]
    fn test_options_start_with_placeholder() {
        let options = build_options(&sample());
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec![PLACEHOLDER_OPTION, "Chess Club", "Gym Class", "Art Club"]);
        assert_eq!(options[0].value, "");
    }

    #[test]
    fn test_empty_participants_render_placeholder() {
        let cards = build_cards(&sample());
        let html = render_card(&cards[2]);
        assert!(html.contains(NO_PARTICIPANTS_MESSAGE));
        assert!(!html.contains("participants-list"));
        assert!(html.contains("15 spots left"));
    }

    #[test]
    fn test_negative_spots_are_rendered() {
        let cards = build_cards(&sample());
        assert!(render_card(&cards[1]).contains("-2 spots left"));
    }

    #[test]
    fn test_hostile_participant_is_escaped_and_round_trips() {
        let hostile = r#"<img src=x onerror="alert('&')">"#;
        let set: ActivitySet = vec![("Drama <Club>".to_string(), details(5, &[hostile]))]
            .into_iter()
            .collect();
        let cards = build_cards(&set);
        let html = render_card(&cards[0]);

        assert!(!html.contains("<img"));
        assert!(!html.contains("<Club>"));
        assert!(!html.contains("alert('"));
        assert!(html.contains("&lt;img src=x onerror=&quot;alert(&#039;&amp;&#039;)&quot;&gt;"));
        assert!(html.contains("Drama &lt;Club&gt;"));
        assert_eq!(html.matches(r#"class="participant-item""#).count(), 1);
        assert_eq!(html.matches(r#"class="delete-form""#).count(), 1);

        assert_eq!(read_attr(&html, "data-email").as_deref(), Some(hostile));
        assert_eq!(read_attr(&html, "data-activity").as_deref(), Some("Drama <Club>"));
        assert_eq!(cards[0].participants[0].remove.click_target().data("email"), Some(hostile));
    }

    #[test]
    fn test_render_list_states() {
        assert!(render_list(&ListArea::Loading).contains(LOADING_MESSAGE));
        assert!(render_list(&ListArea::LoadFailed).contains(LOAD_FAILED_MESSAGE));

        let cards = build_cards(&sample());
        let html = render_list(&ListArea::Cards(cards));
        assert_eq!(html.matches(r#"class="activity-card""#).count(), 3);
    }

    #[test]
    fn test_render_options_marks_selection() {
        let options = build_options(&sample());
        let html = render_options(&options, "Gym Class");
        assert!(html.contains(r#"<option value="Gym Class" selected>Gym Class</option>"#));
        assert!(html.contains(r#"<option value="">-- Select an activity --</option>"#));
        assert_eq!(html.matches(" selected").count(), 1);
    }
}
