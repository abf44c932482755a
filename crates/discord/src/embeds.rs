use chrono::{DateTime, Utc};
use serde::Serialize;

use araminator_core::{Champion, SessionError, SessionSummary, TeamSummary};

/// Discord's blue accent, used for the session display embed.
pub const EMBED_COLOR_BLUE: u32 = 0x3498db;

/// Hard ceiling Discord places on one message body; champion listings are
/// truncated to stay under it.
pub const MESSAGE_BODY_LIMIT: usize = 1998;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    Success,
    Danger,
    Secondary,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ButtonElement {
    pub custom_id: String,
    pub label: String,
    pub style: ButtonStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl ButtonElement {
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self { custom_id: custom_id.into(), label: label.into(), style, emoji: None }
    }

    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActionRow {
    pub components: Vec<ButtonElement>,
}

/// One renderable message: fallback text for notification surfaces, optional
/// embed, optional button rows, and whether it should be an ephemeral reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageTemplate {
    pub fallback_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
    pub action_rows: Vec<ActionRow>,
    pub ephemeral: bool,
}

pub struct EmbedBuilder {
    embed: Embed,
}

impl EmbedBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            embed: Embed {
                title: title.into(),
                description: None,
                color: EMBED_COLOR_BLUE,
                fields: Vec::new(),
                timestamp: None,
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.embed.description = Some(description.into());
        self
    }

    pub fn field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.embed.fields.push(EmbedField { name: name.into(), value: value.into(), inline });
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.embed.timestamp = Some(timestamp);
        self
    }

    pub fn build(self) -> Embed {
        self.embed
    }
}

pub mod action_ids {
    pub const JOIN: &str = "aram.join.v1";
    pub const LEAVE: &str = "aram.leave.v1";
    pub const ROLL_TEAMS: &str = "aram.roll_teams.v1";
    pub const ROLL_CHAMPIONS: &str = "aram.roll_champions.v1";
    pub const SWAP_TEAM: &str = "aram.swap_team.v1";
}

/// The live session display: signed-up roster, team blocks once teams exist,
/// and the five session buttons.
pub fn session_summary_message(summary: &SessionSummary, now: DateTime<Utc>) -> MessageTemplate {
    let mut builder = EmbedBuilder::new("🏆 ARAM Session").timestamp(now);

    let signed_up = if summary.signed_up.is_empty() {
        "No one has signed up yet!".to_owned()
    } else {
        summary
            .signed_up
            .iter()
            .map(|entry| format!("<@{}> ({})", entry.identity.0, entry.display_name))
            .collect::<Vec<_>>()
            .join("\n")
    };
    builder = builder.field("Signed-up Players", signed_up, false);

    if let Some(team) = &summary.team_a {
        builder = team_fields(builder, "Team 1", team);
    }
    if let Some(team) = &summary.team_b {
        builder = team_fields(builder, "Team 2", team);
    }

    MessageTemplate {
        fallback_text: format!("ARAM session: {} signed up", summary.participant_count()),
        embed: Some(builder.build()),
        action_rows: vec![ActionRow {
            components: vec![
                ButtonElement::new(action_ids::JOIN, "Join!", ButtonStyle::Success).emoji("😎"),
                ButtonElement::new(action_ids::LEAVE, "Leave!", ButtonStyle::Danger).emoji("🚪"),
                ButtonElement::new(action_ids::ROLL_TEAMS, "Roll Teams!", ButtonStyle::Primary)
                    .emoji("🎲"),
                ButtonElement::new(
                    action_ids::ROLL_CHAMPIONS,
                    "Roll Champions!",
                    ButtonStyle::Primary,
                )
                .emoji("🎲"),
                ButtonElement::new(action_ids::SWAP_TEAM, "Swap Team!", ButtonStyle::Secondary)
                    .emoji("🔄"),
            ],
        }],
        ephemeral: false,
    }
}

fn team_fields(builder: EmbedBuilder, label: &str, team: &TeamSummary) -> EmbedBuilder {
    let members = team
        .members
        .iter()
        .map(|entry| format!("<@{}> ({})", entry.identity.0, entry.display_name))
        .collect::<Vec<_>>()
        .join("\n");

    let champions = if team.champions.is_empty() {
        format!("No champions assigned to {label}!")
    } else {
        team.champions.iter().map(champion_line).collect::<Vec<_>>().join("\n")
    };

    builder
        .field(format!("{label} Players"), members, true)
        .field(format!("{label} Champions"), champions, true)
        .field("\u{200b}", "\u{200b}", false)
}

fn champion_line(champion: &Champion) -> String {
    match &champion.emoji {
        Some(emoji) => format!("<:{}:{}> {}", champion.id, emoji, champion.name),
        None => champion.name.clone(),
    }
}

/// Transient confirmation shown only to the acting user.
pub fn notice_message(text: impl Into<String>) -> MessageTemplate {
    MessageTemplate {
        fallback_text: text.into(),
        embed: None,
        action_rows: Vec::new(),
        ephemeral: true,
    }
}

/// Typed session failures rendered as ephemeral notices. Duplicate sign-up is
/// presented in a friendly tone rather than as an error.
pub fn failure_notice(error: &SessionError) -> MessageTemplate {
    let marker = match error {
        SessionError::AlreadySignedUp(_) => "ℹ️",
        _ => "❌",
    };
    notice_message(format!("{marker} {}", error.user_notice()))
}

pub fn register_message(riot_id: &str, updated: bool) -> MessageTemplate {
    let text = if updated {
        format!("You were already registered, but I updated your information! Registered as **{riot_id}**.")
    } else {
        format!("✅ Registered as **{riot_id}**!")
    };
    notice_message(text)
}

pub fn champion_sync_message(count: usize) -> MessageTemplate {
    notice_message(format!("Champion data synced ({count} champions)."))
}

/// Full catalog listing, truncated to the platform message limit.
pub fn champion_list_message(champions: &[Champion]) -> MessageTemplate {
    let mut body = String::new();
    for champion in champions {
        let line = champion_line(champion);
        if body.len() + line.len() + 1 > MESSAGE_BODY_LIMIT {
            break;
        }
        body.push_str(&line);
        body.push('\n');
    }
    if body.is_empty() {
        body.push_str("No champions cached yet. Run a champion sync first.");
    }

    MessageTemplate {
        fallback_text: format!("{} champions", champions.len()),
        embed: Some(EmbedBuilder::new("Champions").description(body).build()),
        action_rows: Vec::new(),
        ephemeral: false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use araminator_core::{
        Champion, Identity, RosterEntry, SessionError, SessionSummary, TeamSummary,
    };

    use super::{
        champion_list_message, failure_notice, session_summary_message, ButtonStyle,
        MESSAGE_BODY_LIMIT,
    };

    fn entry(id: &str) -> RosterEntry {
        RosterEntry { identity: Identity(id.to_owned()), display_name: format!("player-{id}") }
    }

    fn champion(key: i64, emoji: Option<&str>) -> Champion {
        Champion {
            key,
            id: format!("champ{key}"),
            name: format!("Champ {key}"),
            emoji: emoji.map(str::to_owned),
        }
    }

    #[test]
    fn empty_session_renders_a_placeholder_roster() {
        let message = session_summary_message(&SessionSummary::default(), Utc::now());

        let embed = message.embed.expect("embed");
        assert_eq!(embed.fields.len(), 1);
        assert!(embed.fields[0].value.contains("No one has signed up yet!"));
        assert!(!message.ephemeral);
    }

    #[test]
    fn session_buttons_cover_all_five_actions() {
        let message = session_summary_message(&SessionSummary::default(), Utc::now());

        let ids: Vec<&str> = message.action_rows[0]
            .components
            .iter()
            .map(|button| button.custom_id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                "aram.join.v1",
                "aram.leave.v1",
                "aram.roll_teams.v1",
                "aram.roll_champions.v1",
                "aram.swap_team.v1",
            ],
        );
        assert_eq!(message.action_rows[0].components[0].style, ButtonStyle::Success);
    }

    #[test]
    fn team_blocks_render_members_mentions_and_champions() {
        let summary = SessionSummary {
            signed_up: vec![entry("1"), entry("2")],
            team_a: Some(TeamSummary {
                members: vec![entry("1")],
                champions: vec![champion(1, Some("111")), champion(2, None)],
            }),
            team_b: Some(TeamSummary { members: vec![entry("2")], champions: Vec::new() }),
        };

        let message = session_summary_message(&summary, Utc::now());
        let embed = message.embed.expect("embed");

        let team_a_champs =
            &embed.fields.iter().find(|field| field.name == "Team 1 Champions").expect("field").value;
        assert!(team_a_champs.contains("<:champ1:111> Champ 1"));
        assert!(team_a_champs.contains("Champ 2"));

        let team_b_champs =
            &embed.fields.iter().find(|field| field.name == "Team 2 Champions").expect("field").value;
        assert!(team_b_champs.contains("No champions assigned to Team 2!"));

        let team_a_players =
            &embed.fields.iter().find(|field| field.name == "Team 1 Players").expect("field").value;
        assert!(team_a_players.contains("<@1> (player-1)"));
    }

    #[test]
    fn failure_notices_are_ephemeral_and_user_worded() {
        let message = failure_notice(&SessionError::NoActiveSession);
        assert!(message.ephemeral);
        assert!(message.fallback_text.starts_with("❌"));

        let duplicate = failure_notice(&SessionError::AlreadySignedUp(Identity("1".to_owned())));
        assert!(duplicate.fallback_text.starts_with("ℹ️"));
    }

    #[test]
    fn champion_listing_truncates_at_the_message_limit() {
        let champions: Vec<_> = (0..500).map(|key| champion(key, None)).collect();
        let message = champion_list_message(&champions);

        let body = message.embed.expect("embed").description.expect("description");
        assert!(body.len() <= MESSAGE_BODY_LIMIT);
        assert!(body.contains("Champ 0"));
    }
}
